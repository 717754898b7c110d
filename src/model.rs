use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default list page size, mirrored in the footer hint.
pub const DEFAULT_LIMIT: u64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    /// The stored preference is a string flag: the literal "false" selects
    /// imperial display, any other value selects metric.
    pub fn from_setting(value: &str) -> Self {
        if value.trim() == "false" {
            Units::Imperial
        } else {
            Units::Metric
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Units::Metric => "km",
            Units::Imperial => "mi",
        }
    }

    pub fn query_value(self) -> &'static str {
        match self {
            Units::Metric => "true",
            Units::Imperial => "false",
        }
    }
}

pub fn format_distance(value: i64, units: Units) -> String {
    format!("{} {}", group_thousands(value), units.suffix())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead % 3 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    #[serde(default)]
    pub icao: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(rename = "type")]
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Airport {
    /// Short code for headings: IATA when present, else municipality, else ICAO.
    pub fn heading_label(&self) -> String {
        self.iata
            .clone()
            .or_else(|| self.municipality.clone())
            .or_else(|| self.icao.clone())
            .unwrap_or_else(|| "??".to_string())
    }

    /// Table cell: "Municipality (IATA)" with ICAO as the code fallback.
    pub fn table_label(&self) -> String {
        let code = self
            .iata
            .clone()
            .or_else(|| self.icao.clone())
            .unwrap_or_else(|| "??".to_string());
        match &self.municipality {
            Some(muni) if !muni.is_empty() => format!("{muni} ({code})"),
            _ => code,
        }
    }

    pub fn code_pair(&self) -> String {
        format!(
            "{}/{}",
            self.icao.as_deref().unwrap_or("-"),
            self.iata.as_deref().unwrap_or("-")
        )
    }

    pub fn location_line(&self) -> String {
        [
            self.continent.as_deref(),
            self.country.as_deref(),
            self.region.as_deref(),
            self.municipality.as_deref(),
        ]
        .iter()
        .filter_map(|part| *part)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub origin: Airport,
    #[serde(default)]
    pub destination: Airport,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub seat: Option<String>,
    #[serde(default)]
    pub ticket_class: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub airplane: Option<String>,
    #[serde(default)]
    pub tail_number: Option<String>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub const SEAT_CHOICES: [&str; 3] = ["aisle", "middle", "window"];
pub const CLASS_CHOICES: [&str; 5] = ["private", "first", "business", "economy+", "economy"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Number,
    Date,
    Time,
    Airport,
    Seat,
    TicketClass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightField {
    Date,
    Origin,
    Destination,
    DepartureTime,
    ArrivalTime,
    ArrivalDate,
    Seat,
    TicketClass,
    Duration,
    Distance,
    Airplane,
    TailNumber,
    Airline,
    FlightNumber,
    Notes,
}

impl FlightField {
    /// Edit-overlay order: timings first, then airports, then the rest.
    pub const ALL: [FlightField; 15] = [
        FlightField::Date,
        FlightField::DepartureTime,
        FlightField::ArrivalTime,
        FlightField::ArrivalDate,
        FlightField::Duration,
        FlightField::Origin,
        FlightField::Destination,
        FlightField::Distance,
        FlightField::Seat,
        FlightField::TicketClass,
        FlightField::Airplane,
        FlightField::TailNumber,
        FlightField::Airline,
        FlightField::FlightNumber,
        FlightField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlightField::Date => "Date",
            FlightField::Origin => "Origin",
            FlightField::Destination => "Destination",
            FlightField::DepartureTime => "Departure Time",
            FlightField::ArrivalTime => "Arrival Time",
            FlightField::ArrivalDate => "Arrival Date",
            FlightField::Seat => "Seat",
            FlightField::TicketClass => "Class",
            FlightField::Duration => "Duration",
            FlightField::Distance => "Distance",
            FlightField::Airplane => "Airplane",
            FlightField::TailNumber => "Tail Number",
            FlightField::Airline => "Airline",
            FlightField::FlightNumber => "Flight Number",
            FlightField::Notes => "Notes",
        }
    }

    pub fn kind(self) -> InputKind {
        match self {
            FlightField::Date | FlightField::ArrivalDate => InputKind::Date,
            FlightField::DepartureTime | FlightField::ArrivalTime => InputKind::Time,
            FlightField::Duration | FlightField::Distance => InputKind::Number,
            FlightField::Origin | FlightField::Destination => InputKind::Airport,
            FlightField::Seat => InputKind::Seat,
            FlightField::TicketClass => InputKind::TicketClass,
            _ => InputKind::Text,
        }
    }

    pub fn hint(self) -> &'static str {
        match self.kind() {
            InputKind::Date => "YYYY-MM-DD",
            InputKind::Time => "HH:MM",
            InputKind::Number => "number",
            InputKind::Airport => "ICAO code",
            InputKind::Seat => "aisle/middle/window",
            InputKind::TicketClass => "private/first/business/economy+/economy",
            InputKind::Text => "text",
        }
    }
}

/// Sparse update for a single flight. A field is present iff the user
/// staged a value for it; blank input removes the field again, so a saved
/// patch only ever carries touched fields. Zero is a real value here, not
/// a clear marker.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airplane: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FlightPatch {
    /// Stages `raw` for `field`. Blank input removes the field from the
    /// patch; anything else is validated per the field's input kind.
    pub fn set(&mut self, field: FlightField, raw: &str) -> Result<(), String> {
        let text = raw.trim();
        if text.is_empty() {
            self.clear(field);
            return Ok(());
        }

        match field.kind() {
            InputKind::Date => {
                parse_date(text)?;
            }
            InputKind::Time => {
                parse_time(text)?;
            }
            InputKind::Number => {
                let value = text
                    .parse::<i64>()
                    .map_err(|_| format!("{} must be a number, got '{text}'", field.label()))?;
                match field {
                    FlightField::Duration => self.duration = Some(value),
                    FlightField::Distance => self.distance = Some(value),
                    _ => {}
                }
                return Ok(());
            }
            InputKind::Seat => {
                let lowered = text.to_ascii_lowercase();
                if !SEAT_CHOICES.contains(&lowered.as_str()) {
                    return Err(format!(
                        "Seat must be one of {}, got '{text}'",
                        SEAT_CHOICES.join("/")
                    ));
                }
                self.seat = Some(lowered);
                return Ok(());
            }
            InputKind::TicketClass => {
                let lowered = text.to_ascii_lowercase();
                if !CLASS_CHOICES.contains(&lowered.as_str()) {
                    return Err(format!(
                        "Class must be one of {}, got '{text}'",
                        CLASS_CHOICES.join("/")
                    ));
                }
                self.ticket_class = Some(lowered);
                return Ok(());
            }
            InputKind::Airport => {
                let code = text.to_ascii_uppercase();
                match field {
                    FlightField::Origin => self.origin = Some(code),
                    FlightField::Destination => self.destination = Some(code),
                    _ => {}
                }
                return Ok(());
            }
            InputKind::Text => {}
        }

        let value = Some(text.to_string());
        match field {
            FlightField::Date => self.date = value,
            FlightField::DepartureTime => self.departure_time = value,
            FlightField::ArrivalTime => self.arrival_time = value,
            FlightField::ArrivalDate => self.arrival_date = value,
            FlightField::Airplane => self.airplane = value,
            FlightField::TailNumber => self.tail_number = value,
            FlightField::Airline => self.airline = value,
            FlightField::FlightNumber => self.flight_number = value,
            FlightField::Notes => self.notes = value,
            _ => {}
        }
        Ok(())
    }

    pub fn clear(&mut self, field: FlightField) {
        match field {
            FlightField::Date => self.date = None,
            FlightField::Origin => self.origin = None,
            FlightField::Destination => self.destination = None,
            FlightField::DepartureTime => self.departure_time = None,
            FlightField::ArrivalTime => self.arrival_time = None,
            FlightField::ArrivalDate => self.arrival_date = None,
            FlightField::Seat => self.seat = None,
            FlightField::TicketClass => self.ticket_class = None,
            FlightField::Duration => self.duration = None,
            FlightField::Distance => self.distance = None,
            FlightField::Airplane => self.airplane = None,
            FlightField::TailNumber => self.tail_number = None,
            FlightField::Airline => self.airline = None,
            FlightField::FlightNumber => self.flight_number = None,
            FlightField::Notes => self.notes = None,
        }
    }

    /// Staged value for display in the edit overlay.
    pub fn staged(&self, field: FlightField) -> Option<String> {
        match field {
            FlightField::Date => self.date.clone(),
            FlightField::Origin => self.origin.clone(),
            FlightField::Destination => self.destination.clone(),
            FlightField::DepartureTime => self.departure_time.clone(),
            FlightField::ArrivalTime => self.arrival_time.clone(),
            FlightField::ArrivalDate => self.arrival_date.clone(),
            FlightField::Seat => self.seat.clone(),
            FlightField::TicketClass => self.ticket_class.clone(),
            FlightField::Duration => self.duration.map(|v| v.to_string()),
            FlightField::Distance => self.distance.map(|v| v.to_string()),
            FlightField::Airplane => self.airplane.clone(),
            FlightField::TailNumber => self.tail_number.clone(),
            FlightField::Airline => self.airline.clone(),
            FlightField::FlightNumber => self.flight_number.clone(),
            FlightField::Notes => self.notes.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        FlightField::ALL.iter().all(|f| self.staged(*f).is_none())
    }

    pub fn len(&self) -> usize {
        FlightField::ALL
            .iter()
            .filter(|f| self.staged(**f).is_some())
            .count()
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| format!("must be in YYYY-MM-DD format, got '{text}'"))
}

fn parse_time(text: &str) -> Result<(), String> {
    let valid = text.len() == 5
        && text.as_bytes()[2] == b':'
        && text[..2].parse::<u8>().map(|h| h < 24).unwrap_or(false)
        && text[3..].parse::<u8>().map(|m| m < 60).unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(format!("must be in HH:MM format, got '{text}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Seat,
    TicketClass,
    Duration,
    Distance,
}

impl SortKey {
    pub fn wire(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Seat => "seat",
            SortKey::TicketClass => "ticket_class",
            SortKey::Duration => "duration",
            SortKey::Distance => "distance",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(SortKey::Date),
            "seat" => Some(SortKey::Seat),
            "ticket_class" | "class" => Some(SortKey::TicketClass),
            "duration" => Some(SortKey::Duration),
            "distance" => Some(SortKey::Distance),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn wire(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// The submitted filter form, raw text per field. Only non-blank fields
/// make it into the resulting `FilterSpec`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub limit: String,
    pub offset: String,
    pub order: String,
    pub sort: String,
    pub start: String,
    pub end: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterFormField {
    Limit,
    Offset,
    Order,
    Sort,
    Start,
    End,
}

impl FilterFormField {
    pub const ALL: [FilterFormField; 6] = [
        FilterFormField::Limit,
        FilterFormField::Offset,
        FilterFormField::Order,
        FilterFormField::Sort,
        FilterFormField::Start,
        FilterFormField::End,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterFormField::Limit => "Limit",
            FilterFormField::Offset => "Offset",
            FilterFormField::Order => "Order",
            FilterFormField::Sort => "Sort By",
            FilterFormField::Start => "Start Date",
            FilterFormField::End => "End Date",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FilterFormField::Limit | FilterFormField::Offset => "number",
            FilterFormField::Order => "asc/desc",
            FilterFormField::Sort => "date/seat/class/duration/distance",
            FilterFormField::Start | FilterFormField::End => "YYYY-MM-DD",
        }
    }
}

impl FilterForm {
    pub fn value(&self, field: FilterFormField) -> &str {
        match field {
            FilterFormField::Limit => &self.limit,
            FilterFormField::Offset => &self.offset,
            FilterFormField::Order => &self.order,
            FilterFormField::Sort => &self.sort,
            FilterFormField::Start => &self.start,
            FilterFormField::End => &self.end,
        }
    }

    pub fn value_mut(&mut self, field: FilterFormField) -> &mut String {
        match field {
            FilterFormField::Limit => &mut self.limit,
            FilterFormField::Offset => &mut self.offset,
            FilterFormField::Order => &mut self.order,
            FilterFormField::Sort => &mut self.sort,
            FilterFormField::Start => &mut self.start,
            FilterFormField::End => &mut self.end,
        }
    }
}

/// Constraints on the flight list query. Unset fields are omitted from
/// the outgoing request entirely, never sent as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order: Option<SortOrder>,
    pub sort: Option<SortKey>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FilterSpec {
    /// Collects only non-blank form fields; blank fields stay unset.
    pub fn from_form(form: &FilterForm) -> Result<Self, String> {
        let mut spec = FilterSpec::default();

        let limit = form.limit.trim();
        if !limit.is_empty() {
            spec.limit = Some(
                limit
                    .parse::<u64>()
                    .map_err(|_| format!("Limit must be a number, got '{limit}'"))?,
            );
        }
        let offset = form.offset.trim();
        if !offset.is_empty() {
            spec.offset = Some(
                offset
                    .parse::<u64>()
                    .map_err(|_| format!("Offset must be a number, got '{offset}'"))?,
            );
        }
        let order = form.order.trim();
        if !order.is_empty() {
            spec.order =
                Some(SortOrder::from_str(order).ok_or_else(|| format!("Unknown order '{order}'"))?);
        }
        let sort = form.sort.trim();
        if !sort.is_empty() {
            spec.sort =
                Some(SortKey::from_str(sort).ok_or_else(|| format!("Unknown sort key '{sort}'"))?);
        }
        let start = form.start.trim();
        if !start.is_empty() {
            parse_date(start).map_err(|err| format!("Start date {err}"))?;
            spec.start = Some(start.to_string());
        }
        let end = form.end.trim();
        if !end.is_empty() {
            parse_date(end).map_err(|err| format!("End date {err}"))?;
            spec.end = Some(end.to_string());
        }

        Ok(spec)
    }

    /// Query pairs for exactly the fields that are set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.wire().to_string()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.wire().to_string()));
        }
        if let Some(start) = &self.start {
            pairs.push(("start", start.clone()));
        }
        if let Some(end) = &self.end {
            pairs.push(("end", end.clone()));
        }
        pairs
    }

    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_distance, FilterForm, FilterSpec, Flight, FlightField, FlightPatch, SortKey,
        SortOrder, Units,
    };

    const MOCK: &str = r#"[
        {
            "id": 12,
            "date": "2024-05-17",
            "origin": {
                "icao": "EGLL",
                "iata": "LHR",
                "type": "large_airport",
                "name": "London Heathrow Airport",
                "municipality": "London",
                "region": "England",
                "country": "GB",
                "continent": "EU",
                "latitude": 51.4706,
                "longitude": -0.461941
            },
            "destination": {
                "icao": "KJFK",
                "iata": "JFK",
                "type": "large_airport",
                "name": "John F Kennedy International Airport",
                "municipality": "New York",
                "region": "New York",
                "country": "US",
                "continent": "NA",
                "latitude": 40.639801,
                "longitude": -73.7789
            },
            "departureTime": "09:40",
            "arrivalTime": "12:55",
            "arrivalDate": "2024-05-17",
            "seat": "window",
            "ticketClass": "economy",
            "duration": 435,
            "distance": 5540,
            "airplane": "Boeing 777-300ER",
            "tailNumber": "G-STBH",
            "airline": "British Airways",
            "flightNumber": "BA117",
            "notes": "Upper deck"
        },
        { "id": 13, "date": "2024-06-02", "origin": { "icao": "KJFK" }, "destination": { "icao": "EGLL" } }
    ]"#;

    #[test]
    fn parse_mock_flights() {
        let flights: Vec<Flight> = serde_json::from_str(MOCK).unwrap();
        assert_eq!(flights.len(), 2);

        let first = &flights[0];
        assert_eq!(first.id, 12);
        assert_eq!(first.origin.iata.as_deref(), Some("LHR"));
        assert_eq!(first.destination.municipality.as_deref(), Some("New York"));
        assert_eq!(first.departure_time.as_deref(), Some("09:40"));
        assert_eq!(first.ticket_class.as_deref(), Some("economy"));
        assert_eq!(first.distance, Some(5540));

        let second = &flights[1];
        assert_eq!(second.id, 13);
        assert!(second.departure_time.is_none());
        assert!(second.duration.is_none());
    }

    #[test]
    fn airport_labels() {
        let flights: Vec<Flight> = serde_json::from_str(MOCK).unwrap();
        let origin = &flights[0].origin;
        assert_eq!(origin.heading_label(), "LHR");
        assert_eq!(origin.table_label(), "London (LHR)");
        assert_eq!(origin.code_pair(), "EGLL/LHR");
        assert_eq!(origin.location_line(), "EU, GB, England, London");

        let bare = &flights[1].origin;
        assert_eq!(bare.heading_label(), "KJFK");
        assert_eq!(bare.table_label(), "KJFK");
    }

    #[test]
    fn patch_blank_input_removes_field() {
        let mut patch = FlightPatch::default();
        patch.set(FlightField::Seat, "window").unwrap();
        patch.set(FlightField::Airline, "Delta").unwrap();
        assert_eq!(patch.len(), 2);

        patch.set(FlightField::Seat, "").unwrap();
        assert!(patch.staged(FlightField::Seat).is_none());
        assert_eq!(patch.len(), 1);

        patch.set(FlightField::Airline, "   ").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_zero_is_a_real_value() {
        let mut patch = FlightPatch::default();
        patch.set(FlightField::Duration, "0").unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.duration, Some(0));

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({ "duration": 0 }));
    }

    #[test]
    fn patch_serializes_only_touched_fields() {
        let mut patch = FlightPatch::default();
        patch.set(FlightField::Date, "2024-05-17").unwrap();
        patch.set(FlightField::Origin, "egll").unwrap();
        patch.set(FlightField::TicketClass, "Economy+").unwrap();

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "date": "2024-05-17",
                "origin": "EGLL",
                "ticketClass": "economy+"
            })
        );
    }

    #[test]
    fn patch_validates_inputs() {
        let mut patch = FlightPatch::default();
        assert!(patch.set(FlightField::Date, "17/05/2024").is_err());
        assert!(patch.set(FlightField::DepartureTime, "9:40").is_err());
        assert!(patch.set(FlightField::DepartureTime, "25:00").is_err());
        assert!(patch.set(FlightField::Duration, "long").is_err());
        assert!(patch.set(FlightField::Seat, "couch").is_err());
        assert!(patch.is_empty());

        assert!(patch.set(FlightField::DepartureTime, "09:40").is_ok());
        assert!(patch.set(FlightField::TicketClass, "economy+").is_ok());
    }

    #[test]
    fn filter_form_keeps_only_truthy_fields() {
        let form = FilterForm {
            limit: String::new(),
            sort: "date".to_string(),
            ..FilterForm::default()
        };
        let spec = FilterSpec::from_form(&form).unwrap();
        assert_eq!(
            spec,
            FilterSpec {
                sort: Some(SortKey::Date),
                ..FilterSpec::default()
            }
        );
        assert_eq!(spec.query_pairs(), vec![("sort", "date".to_string())]);
    }

    #[test]
    fn filter_form_full_spec() {
        let form = FilterForm {
            limit: "25".to_string(),
            offset: "50".to_string(),
            order: "desc".to_string(),
            sort: "distance".to_string(),
            start: "2024-01-01".to_string(),
            end: "2024-12-31".to_string(),
        };
        let spec = FilterSpec::from_form(&form).unwrap();
        assert_eq!(spec.limit, Some(25));
        assert_eq!(spec.order, Some(SortOrder::Desc));
        assert_eq!(spec.sort, Some(SortKey::Distance));
        assert_eq!(spec.effective_limit(), 25);

        let pairs = spec.query_pairs();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&("order", "DESC".to_string())));
        assert!(pairs.contains(&("start", "2024-01-01".to_string())));
    }

    #[test]
    fn filter_form_rejects_bad_values() {
        let form = FilterForm {
            limit: "many".to_string(),
            ..FilterForm::default()
        };
        assert!(FilterSpec::from_form(&form).is_err());

        let form = FilterForm {
            start: "01-01-2024".to_string(),
            ..FilterForm::default()
        };
        assert!(FilterSpec::from_form(&form).is_err());

        let form = FilterForm {
            sort: "altitude".to_string(),
            ..FilterForm::default()
        };
        assert!(FilterSpec::from_form(&form).is_err());
    }

    #[test]
    fn effective_limit_defaults_to_fifty() {
        assert_eq!(FilterSpec::default().effective_limit(), 50);
    }

    #[test]
    fn units_from_setting() {
        assert_eq!(Units::from_setting("false"), Units::Imperial);
        assert_eq!(Units::from_setting("true"), Units::Metric);
        assert_eq!(Units::from_setting(""), Units::Metric);
        assert_eq!(Units::from_setting("anything"), Units::Metric);
    }

    #[test]
    fn distance_rendering() {
        assert_eq!(format_distance(500, Units::Imperial), "500 mi");
        assert_eq!(format_distance(500, Units::Metric), "500 km");
        assert_eq!(format_distance(5540, Units::Metric), "5,540 km");
        assert_eq!(format_distance(1234567, Units::Imperial), "1,234,567 mi");
    }
}
