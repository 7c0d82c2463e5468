use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace as sdktrace, Resource};
use opentelemetry_semantic_conventions::resource;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// sqlx and sea_orm log every statement at debug.
const DEFAULT_FILTER: &str = "info,livestock_server=info,sqlx=warn,sea_orm=warn";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// One flattened JSON object per event, no timestamp (the collector adds it).
    Json,
}

impl LogFormat {
    fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetrySettings {
    pub service_name: String,
    pub format: LogFormat,
    pub filter: String,
    pub otlp_endpoint: Option<String>,
}

impl TelemetrySettings {
    /// Reads `RUST_LOG_FORMAT`, `RUST_LOG` and `OTEL_EXPORTER_OTLP_ENDPOINT`.
    pub fn from_lookup(service_name: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            service_name: service_name.to_string(),
            format: LogFormat::from_setting(lookup("RUST_LOG_FORMAT").as_deref()),
            filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            otlp_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.trim().is_empty()),
        }
    }
}

pub fn init_telemetry(service_name: &str) {
    init_with(TelemetrySettings::from_lookup(service_name, |name| std::env::var(name).ok()));
}

pub fn init_with(settings: TelemetrySettings) {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&settings.filter));

    let service_name = settings.service_name;
    let otel_layer = settings.otlp_endpoint.and_then(|endpoint| {
        let resource = Resource::new(vec![KeyValue::new(resource::SERVICE_NAME, service_name)]);

        let installed = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint),
            )
            .with_trace_config(
                sdktrace::config()
                    .with_resource(resource)
                    .with_sampler(sdktrace::Sampler::AlwaysOn),
            )
            .install_batch(opentelemetry_sdk::runtime::Tokio);

        match installed {
            Ok(tracer) => Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Err(e) => {
                // No subscriber exists yet to log through.
                eprintln!("OpenTelemetry tracer not installed, continuing without it: {e}");
                None
            }
        }
    });

    match settings.format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .without_time();
            registry.with(otel_layer).with(fmt_layer).init();
        }
        LogFormat::Text => {
            registry
                .with(otel_layer)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> TelemetrySettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TelemetrySettings::from_lookup("livestock-server", |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_quiet_text_logging_without_otlp() {
        let s = settings(&[]);
        assert_eq!(s.format, LogFormat::Text);
        assert_eq!(s.filter, DEFAULT_FILTER);
        assert_eq!(s.otlp_endpoint, None);
    }

    #[test]
    fn reads_format_filter_and_endpoint() {
        let s = settings(&[
            ("RUST_LOG_FORMAT", " JSON "),
            ("RUST_LOG", "debug"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317"),
        ]);
        assert_eq!(s.format, LogFormat::Json);
        assert_eq!(s.filter, "debug");
        assert_eq!(s.otlp_endpoint.as_deref(), Some("http://collector:4317"));
    }

    #[test]
    fn blank_endpoint_disables_otlp() {
        assert_eq!(settings(&[("OTEL_EXPORTER_OTLP_ENDPOINT", "  ")]).otlp_endpoint, None);
    }
}
