//! OpenTelemetry observability setup
//!
//! The codec itself only emits `tracing` events and spans, and records
//! `CodecMetrics` when asked to. Where that telemetry goes is up to the
//! application: this module offers a ready-made pipeline that exports
//! traces and metrics over OTLP/gRPC and prints JSON logs to stdout.
//!
//! Call `init_observability` once at startup and `shutdown_observability`
//! before exit so buffered spans and metrics are flushed.
//!
//! ```rust,no_run
//! use rpcwire_core::{init_observability, shutdown_observability, ObservabilityConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ObservabilityConfig::new("billing-gateway")
//!         .with_endpoint("http://localhost:4317")
//!         .with_log_level("rpcwire_core=debug");
//!
//!     init_observability(config).expect("Failed to init observability");
//!
//!     // ... encode and decode ...
//!
//!     shutdown_observability();
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: default collector endpoint
//! - `RUST_LOG`: log filter; takes precedence over `log_level`

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, SdkTracerProvider, Tracer};
use opentelemetry_sdk::Resource;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Error returned when the telemetry pipeline cannot be built
pub type InitError = Box<dyn std::error::Error + Send + Sync>;

const METRICS_EXPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Providers installed by `init_observability`, kept for shutdown
static PROVIDERS: Mutex<Option<Providers>> = Mutex::new(None);

struct Providers {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Reported as the `service.name` resource attribute
    pub service_name: String,
    pub service_version: String,
    /// OTLP/gRPC collector endpoint
    pub otlp_endpoint: String,
    pub enable_traces: bool,
    pub enable_metrics: bool,
    /// Print JSON log lines to stdout
    pub enable_logs: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "rpcwire".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: true,
            enable_metrics: true,
            enable_logs: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub fn with_logs(mut self, enable: bool) -> Self {
        self.enable_logs = enable;
        self
    }

    fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes(vec![
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                    self.service_name.clone(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                    self.service_version.clone(),
                ),
            ])
            .build()
    }
}

/// Install the global tracer provider, meter provider and tracing subscriber
///
/// Exporters with traces or metrics enabled must be built inside a Tokio
/// runtime. Fails if a global subscriber is already installed.
pub fn init_observability(config: ObservabilityConfig) -> Result<(), InitError> {
    let tracer_provider = if config.enable_traces {
        Some(init_tracer_provider(&config)?)
    } else {
        None
    };

    let meter_provider = if config.enable_metrics {
        let provider = init_meter_provider(&config)?;
        global::set_meter_provider(provider.clone());
        Some(provider)
    } else {
        None
    };

    let tracer = tracer_provider.as_ref().map(|provider| {
        global::set_tracer_provider(provider.clone());
        provider.tracer(config.service_name.clone())
    });

    init_tracing_subscriber(&config, tracer)?;

    if let Ok(mut installed) = PROVIDERS.lock() {
        *installed = Some(Providers {
            tracer: tracer_provider,
            meter: meter_provider,
        });
    }

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        logs = config.enable_logs,
        "OpenTelemetry initialized"
    );

    Ok(())
}

fn init_tracer_provider(config: &ObservabilityConfig) -> Result<SdkTracerProvider, InitError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(config.resource())
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build())
}

fn init_meter_provider(config: &ObservabilityConfig) -> Result<SdkMeterProvider, InitError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(METRICS_EXPORT_INTERVAL)
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(config.resource())
        .build())
}

fn init_tracing_subscriber(
    config: &ObservabilityConfig,
    tracer: Option<Tracer>,
) -> Result<(), InitError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let telemetry_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));
    let fmt_layer = config.enable_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .json()
    });

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Flush and shut down the providers installed by `init_observability`
///
/// Safe to call more than once, or without a prior init.
pub fn shutdown_observability() {
    let providers = match PROVIDERS.lock() {
        Ok(mut installed) => installed.take(),
        Err(_) => None,
    };
    let Some(providers) = providers else {
        return;
    };

    tracing::info!("Shutting down OpenTelemetry");

    if let Some(provider) = providers.tracer {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
    if let Some(provider) = providers.meter {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Meter provider shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.service_name, "rpcwire");
        assert_eq!(config.service_version, env!("CARGO_PKG_VERSION"));
        assert!(config.enable_traces);
        assert!(config.enable_metrics);
        assert!(config.enable_logs);
    }

    #[test]
    fn test_config_builder_chaining() {
        let config = ObservabilityConfig::new("gateway")
            .with_endpoint("http://collector:4317")
            .with_log_level("rpcwire_core=trace")
            .with_version("2.0.0")
            .with_traces(false)
            .with_metrics(false)
            .with_logs(true);

        assert_eq!(config.service_name, "gateway");
        assert_eq!(config.otlp_endpoint, "http://collector:4317");
        assert_eq!(config.log_level, "rpcwire_core=trace");
        assert_eq!(config.service_version, "2.0.0");
        assert!(!config.enable_traces);
        assert!(!config.enable_metrics);
        assert!(config.enable_logs);
    }

    #[test]
    fn test_init_all_disabled() {
        let config = ObservabilityConfig::new("test-none")
            .with_traces(false)
            .with_metrics(false)
            .with_logs(false)
            .with_log_level("warn");

        assert!(init_observability(config).is_ok());
        shutdown_observability();
    }

    #[test]
    fn test_shutdown_idempotent() {
        shutdown_observability();
        shutdown_observability();
    }
}
