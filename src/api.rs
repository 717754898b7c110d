use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::model::{FilterSpec, Flight, FlightPatch, Units};

/// Work for the API thread. Every command carries the sequence number the
/// issuing controller was at; the matching event echoes it back so stale
/// responses can be recognized and dropped.
#[derive(Clone, Debug)]
pub enum ApiCommand {
    FetchList { seq: u64, filter: FilterSpec },
    FetchFlight { seq: u64, id: i64 },
    SavePatch { seq: u64, id: i64, patch: FlightPatch },
    DeleteFlight { seq: u64, id: i64 },
}

#[derive(Clone, Debug)]
pub enum ApiEvent {
    List {
        seq: u64,
        result: Result<Vec<Flight>, String>,
    },
    Single {
        seq: u64,
        result: Result<Flight, String>,
    },
    Saved {
        seq: u64,
        id: i64,
        result: Result<(), String>,
    },
    Deleted {
        seq: u64,
        id: i64,
        result: Result<(), String>,
    },
    /// The worker itself died; carries no sequence number because it must
    /// surface no matter which fetches are in flight.
    Fatal { message: String },
}

pub fn spawn_api_worker(
    base_url: String,
    units: Units,
    timeout: Duration,
    insecure: bool,
    tx: Sender<ApiEvent>,
    rx: Receiver<ApiCommand>,
) {
    thread::spawn(move || {
        info!("api worker started");
        let client = match reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(timeout)
            .build()
        {
            Ok(client) => client,
            Err(err) => {
                error!("client error: {err}");
                let _ = tx.send(ApiEvent::Fatal {
                    message: format!("Client error: {err}"),
                });
                return;
            }
        };

        while let Ok(command) = rx.recv() {
            let event = match command {
                ApiCommand::FetchList { seq, filter } => {
                    debug!("fetch list (seq {seq})");
                    ApiEvent::List {
                        seq,
                        result: fetch_list(&client, &base_url, units, &filter),
                    }
                }
                ApiCommand::FetchFlight { seq, id } => {
                    debug!("fetch flight {id} (seq {seq})");
                    ApiEvent::Single {
                        seq,
                        result: fetch_flight(&client, &base_url, units, id),
                    }
                }
                ApiCommand::SavePatch { seq, id, patch } => {
                    debug!("patch flight {id} ({} fields, seq {seq})", patch.len());
                    ApiEvent::Saved {
                        seq,
                        id,
                        result: save_patch(&client, &base_url, id, &patch),
                    }
                }
                ApiCommand::DeleteFlight { seq, id } => {
                    debug!("delete flight {id} (seq {seq})");
                    ApiEvent::Deleted {
                        seq,
                        id,
                        result: delete_flight(&client, &base_url, id),
                    }
                }
            };
            if tx.send(event).is_err() {
                debug!("receiver dropped, exiting api worker");
                break;
            }
        }
        info!("api worker exited");
    });
}

fn flights_url(base_url: &str) -> String {
    format!("{}/flights", base_url.trim_end_matches('/'))
}

/// Query for the list endpoint: the units flag plus exactly the filter
/// fields that are set.
fn list_query(units: Units, filter: &FilterSpec) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("metric", units.query_value().to_string())];
    pairs.extend(filter.query_pairs());
    pairs
}

fn fetch_list(
    client: &reqwest::blocking::Client,
    base_url: &str,
    units: Units,
    filter: &FilterSpec,
) -> Result<Vec<Flight>, String> {
    let resp = client
        .get(flights_url(base_url))
        .query(&list_query(units, filter))
        .send()
        .map_err(|err| err.to_string())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    resp.json::<Vec<Flight>>().map_err(|err| err.to_string())
}

fn fetch_flight(
    client: &reqwest::blocking::Client,
    base_url: &str,
    units: Units,
    id: i64,
) -> Result<Flight, String> {
    let resp = client
        .get(flights_url(base_url))
        .query(&[
            ("id", id.to_string()),
            ("metric", units.query_value().to_string()),
        ])
        .send()
        .map_err(|err| err.to_string())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    resp.json::<Flight>().map_err(|err| err.to_string())
}

fn save_patch(
    client: &reqwest::blocking::Client,
    base_url: &str,
    id: i64,
    patch: &FlightPatch,
) -> Result<(), String> {
    let resp = client
        .patch(flights_url(base_url))
        .query(&[("id", id.to_string())])
        .json(patch)
        .send()
        .map_err(|err| err.to_string())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    Ok(())
}

fn delete_flight(
    client: &reqwest::blocking::Client,
    base_url: &str,
    id: i64,
) -> Result<(), String> {
    let resp = client
        .delete(flights_url(base_url))
        .query(&[("id", id.to_string())])
        .send()
        .map_err(|err| err.to_string())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    Ok(())
}
