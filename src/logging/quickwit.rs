//! A `tracing` layer that ships selected events to Quickwit.
//!
//! Only events carrying the configured marker field are forwarded, and the
//! marker's value decides the target index. Events are buffered per index and
//! sent as NDJSON either when a batch fills up or on a fixed interval.

use crate::logging::consts::{
    DEFAULT_LOGGING_BATCH_SIZE, QUICKWIT_FLUSH_INTERVAL, QUICKWIT_LOGGING_CHANNEL_CAPACITY,
};
use reqwest::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::field::{Field, Visit};
use tracing_core::{Event, Subscriber};
use tracing_subscriber::layer::Context as TracingContext;
use tracing_subscriber::Layer;
use url::Url;

type LogRecord = serde_json::Map<String, serde_json::Value>;

pub struct QuickwitLoggingLayerBuilder {
    quickwit_url: Url,
    marker_field: String,
    marker_to_index: HashMap<String, String>,
    batch_size: usize,
}

impl QuickwitLoggingLayerBuilder {
    pub fn new(quickwit_url: Url) -> Self {
        Self {
            quickwit_url,
            marker_field: String::new(),
            marker_to_index: HashMap::new(),
            batch_size: DEFAULT_LOGGING_BATCH_SIZE,
        }
    }

    pub fn marker_field(mut self, field: &str) -> Self {
        self.marker_field = field.to_string();
        self
    }

    pub fn map_marker_to_index(mut self, marker_value: &str, index_id: &str) -> Self {
        self.marker_to_index
            .insert(marker_value.to_string(), index_id.to_string());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Spawns the shipping task, so a Tokio runtime must be running.
    pub fn build(self) -> QuickwitLoggingLayer {
        let (sender, receiver) = mpsc::channel(QUICKWIT_LOGGING_CHANNEL_CAPACITY);
        let shipper = QuickwitShipper {
            http_client: Client::new(),
            quickwit_url: self.quickwit_url,
            batch_size: self.batch_size,
            buffers: HashMap::new(),
        };
        tokio::spawn(shipper.run(receiver));
        QuickwitLoggingLayer {
            sender,
            marker_field: self.marker_field,
            marker_to_index: self.marker_to_index,
        }
    }
}

pub struct QuickwitLoggingLayer {
    sender: mpsc::Sender<QuickwitLogMessage>,
    marker_field: String,
    marker_to_index: HashMap<String, String>,
}

impl QuickwitLoggingLayer {
    fn target_index(&self, event: &Event<'_>) -> Option<String> {
        let mut visitor = MarkerVisitor {
            marker_field: &self.marker_field,
            marker_value: None,
        };
        event.record(&mut visitor);
        visitor
            .marker_value
            .and_then(|value| self.marker_to_index.get(&value).cloned())
    }
}

impl<S: Subscriber> Layer<S> for QuickwitLoggingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: TracingContext<'_, S>) {
        if let Some(index_id) = self.target_index(event) {
            let mut visitor = RecordVisitor::default();
            event.record(&mut visitor);
            // Logging must never stall a request, so a full channel drops the event.
            let _ = self.sender.try_send(QuickwitLogMessage {
                index_id,
                record: visitor.record,
            });
        }
    }
}

struct QuickwitShipper {
    http_client: Client,
    quickwit_url: Url,
    batch_size: usize,
    buffers: HashMap<String, Vec<LogRecord>>,
}

impl QuickwitShipper {
    async fn run(mut self, mut receiver: mpsc::Receiver<QuickwitLogMessage>) {
        let mut flush_interval = time::interval(QUICKWIT_FLUSH_INTERVAL);
        flush_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                message = receiver.recv() => match message {
                    Some(QuickwitLogMessage { index_id, record }) => {
                        let buffer = self.buffers.entry(index_id.clone()).or_default();
                        buffer.push(record);
                        if buffer.len() >= self.batch_size {
                            self.flush(&index_id).await;
                        }
                    }
                    None => break,
                },
                _ = flush_interval.tick() => self.flush_all().await,
            }
        }
        self.flush_all().await;
    }

    async fn flush_all(&mut self) {
        let index_ids = self
            .buffers
            .iter()
            .filter(|(_, buffer)| !buffer.is_empty())
            .map(|(index_id, _)| index_id.clone())
            .collect::<Vec<_>>();
        for index_id in index_ids {
            self.flush(&index_id).await;
        }
    }

    async fn flush(&mut self, index_id: &str) {
        let Some(buffer) = self.buffers.get_mut(index_id) else {
            return;
        };
        let mut body = Vec::new();
        for record in buffer.drain(..) {
            // Writing into a `Vec` cannot fail.
            let _ = serialize_to_ndjson(&mut body, &record);
        }
        let Some(url) = ingest_url(&self.quickwit_url, index_id) else {
            eprintln!("Cannot build a Quickwit ingest URL for index `{index_id}`.");
            return;
        };
        // Shipping failures are reported on stderr: emitting an event here would
        // feed back into this layer.
        if let Err(err) = self.http_client.post(url).body(body).send().await {
            eprintln!("Failed to ship logs to Quickwit index `{index_id}`: {err}");
        }
    }
}

fn ingest_url(quickwit_url: &Url, index_id: &str) -> Option<Url> {
    quickwit_url
        .join(&format!("api/v1/{index_id}/ingest"))
        .ok()
}

struct MarkerVisitor<'a> {
    marker_field: &'a str,
    marker_value: Option<String>,
}

impl Visit for MarkerVisitor<'_> {
    fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == self.marker_field {
            self.marker_value = Some(value.to_string());
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    record: LogRecord,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_u128(&mut self, field: &Field, value: u128) {
        // Quickwit stores integers as 64 bits.
        let value = u64::try_from(value).unwrap_or(u64::MAX);
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record.insert(field.name().to_string(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record
            .insert(field.name().to_string(), format!("{:?}", value).into());
    }
}

#[derive(Debug)]
struct QuickwitLogMessage {
    index_id: String,
    record: LogRecord,
}

fn serialize_to_ndjson<W, V>(mut writer: W, value: &V) -> io::Result<()>
where
    W: io::Write,
    V: ?Sized + Serialize,
{
    serde_json::to_writer(&mut writer, value)?;
    writer.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_url_is_relative_to_base() {
        let base = Url::parse("http://127.0.0.1:7280/").expect("Failed to parse base URL.");

        let url = ingest_url(&base, "image_resizes").expect("Failed to build ingest URL.");

        assert_eq!(url.as_str(), "http://127.0.0.1:7280/api/v1/image_resizes/ingest");
    }

    #[test]
    fn test_records_are_newline_delimited() {
        let mut body = Vec::new();
        let mut record = LogRecord::new();
        record.insert(String::from("status"), 200.into());

        serialize_to_ndjson(&mut body, &record).expect("Failed to serialize record.");
        serialize_to_ndjson(&mut body, &record).expect("Failed to serialize record.");

        assert_eq!(body, b"{\"status\":200}\n{\"status\":200}\n");
    }
}
