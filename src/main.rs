use clap::{Args, Parser, Subcommand};
use elevate_payments::application::batch::ElevateBatch;
use elevate_payments::application::gateway_settings::{
    CoordinatorPorts, GatewaySettingsCoordinator,
};
use elevate_payments::config::{Labels, ParentContext, WidgetContext};
use elevate_payments::domain::events::{ControlSignal, SettingsEvent, event_channel};
use elevate_payments::domain::gateway::GatewayId;
use elevate_payments::domain::ports::{SettingsStore, SettingsStoreBox};
use elevate_payments::domain::settings::{PaymentMethods, WidgetMode};
use elevate_payments::infrastructure::in_memory::{
    InMemoryElevateService, InMemorySettingsStore, ServiceFixture,
};
use elevate_payments::infrastructure::notifier::TracingNotifier;
#[cfg(feature = "storage-rocksdb")]
use elevate_payments::infrastructure::rocksdb::RocksDBSettingsStore;
use elevate_payments::interfaces::csv::gift_reader::GiftReader;
use elevate_payments::interfaces::csv::option_writer::OptionWriter;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file overriding user-facing labels
    #[arg(long, global = true)]
    labels: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the gateway settings of a template and print published events
    Settings(SettingsArgs),
    /// Print the gateway options as CSV
    Options {
        /// Service fixture (JSON)
        fixture: PathBuf,

        /// Run in the gateway management context
        #[arg(long)]
        management: bool,
    },
    /// Add tokenized gifts from a CSV file to an Elevate batch
    Batch {
        /// Service fixture (JSON)
        fixture: PathBuf,

        /// Tokenized gifts CSV file
        gifts: PathBuf,
    },
}

#[derive(Args)]
struct SettingsArgs {
    /// Service fixture (JSON)
    fixture: PathBuf,

    /// Template whose settings are restored and saved
    #[arg(long, default_value = "default")]
    template_id: String,

    /// Run in the gateway management context
    #[arg(long)]
    management: bool,

    /// Gateway to select; "default" selects the default gateway
    #[arg(long)]
    gateway: Option<String>,

    /// Enable or disable ACH
    #[arg(long)]
    ach: Option<bool>,

    /// Enable or disable credit cards
    #[arg(long)]
    credit_card: Option<bool>,

    /// Path to persistent settings database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoordinatorState<'a> {
    mode: WidgetMode,
    selected_gateway: Option<&'a GatewayId>,
    payment_methods: PaymentMethods,
    saved_gateway_not_found: bool,
    default_template: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elevate_payments=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let labels = match &cli.labels {
        Some(path) => Labels::from_json_file(path).into_diagnostic()?,
        None => Labels::default(),
    };

    match cli.command {
        Command::Settings(args) => run_settings(args, labels).await,
        Command::Options {
            fixture,
            management,
        } => run_options(&fixture, management, labels).await,
        Command::Batch { fixture, gifts } => run_batch(&fixture, &gifts).await,
    }
}

async fn run_settings(args: SettingsArgs, labels: Labels) -> Result<()> {
    let fixture = ServiceFixture::from_json_file(&args.fixture).into_diagnostic()?;
    let service = InMemoryElevateService::from_fixture(&fixture);
    let (coordinator_store, host_store) = open_settings_store(args.db_path.as_deref(), &fixture)?;

    let parent = if args.management {
        ParentContext::GatewayManagement
    } else {
        ParentContext::Form
    };
    let context = WidgetContext {
        parent,
        template_id: Some(args.template_id.clone()),
    };

    let (events, mut receiver) = event_channel();
    let ports = CoordinatorPorts {
        directory: Box::new(service.clone()),
        cipher: Box::new(service),
        settings: coordinator_store,
        notifier: Box::new(TracingNotifier),
        events,
    };
    let mut coordinator = GatewaySettingsCoordinator::connect(ports, context, labels).await;
    if !coordinator.is_expanded() {
        coordinator.toggle_expanded().await;
    }

    if let Some(gateway) = args.gateway {
        if args.management {
            coordinator.apply_signal(ControlSignal::EnableGatewaySelection);
        }
        let gateway = (gateway != "default").then(|| GatewayId::new(gateway));
        coordinator.select_gateway(gateway).await.into_diagnostic()?;
    }
    if let Some(enabled) = args.ach {
        coordinator.set_ach_enabled(enabled).await;
    }
    if let Some(enabled) = args.credit_card {
        coordinator.set_credit_card_enabled(enabled).await;
    }

    let state = CoordinatorState {
        mode: coordinator.mode(),
        selected_gateway: coordinator.selected_gateway(),
        payment_methods: coordinator.payment_methods(),
        saved_gateway_not_found: coordinator.saved_gateway_not_found(),
        default_template: coordinator.is_default_template(),
    };
    let state = serde_json::json!({ "event": "state", "payload": state });

    let mut latest = None;
    while let Ok(event) = receiver.try_recv() {
        println!("{}", serde_json::to_string(&event).into_diagnostic()?);
        if let SettingsEvent::SettingsChanged(Some(settings)) = event {
            latest = Some(settings);
        }
    }
    println!("{}", state);

    if let Some(settings) = latest {
        host_store
            .save(&args.template_id, settings)
            .await
            .into_diagnostic()?;
        info!(template_id = %args.template_id, "Saved Elevate settings");
    }

    Ok(())
}

async fn run_options(fixture: &Path, management: bool, labels: Labels) -> Result<()> {
    let fixture = ServiceFixture::from_json_file(fixture).into_diagnostic()?;
    let service = InMemoryElevateService::from_fixture(&fixture);
    let context = if management {
        WidgetContext::management()
    } else {
        WidgetContext::default()
    };

    let (events, _receiver) = event_channel();
    let ports = CoordinatorPorts {
        directory: Box::new(service.clone()),
        cipher: Box::new(service),
        settings: Box::new(InMemorySettingsStore::new()),
        notifier: Box::new(TracingNotifier),
        events,
    };
    let coordinator = GatewaySettingsCoordinator::connect(ports, context, labels).await;

    let stdout = io::stdout();
    let mut writer = OptionWriter::new(stdout.lock());
    writer
        .write_options(coordinator.gateway_options())
        .into_diagnostic()?;

    Ok(())
}

async fn run_batch(fixture: &Path, gifts: &Path) -> Result<()> {
    let fixture = ServiceFixture::from_json_file(fixture).into_diagnostic()?;
    let service = InMemoryElevateService::from_fixture(&fixture);
    let mut batch = ElevateBatch::new(Box::new(service));

    let file = File::open(gifts).into_diagnostic()?;
    let reader = GiftReader::new(file);
    for gift_result in reader.gifts() {
        match gift_result {
            Ok(gift) => match batch.add(&gift).await {
                Ok(authorized) => {
                    println!("{}", serde_json::to_string(&authorized).into_diagnostic()?);
                }
                Err(e) => error!(error = %e, "Error adding gift to batch"),
            },
            Err(e) => error!(error = %e, "Error reading gift"),
        }
    }

    Ok(())
}

fn store_pair<S>(store: S) -> (SettingsStoreBox, SettingsStoreBox)
where
    S: SettingsStore + Clone + 'static,
{
    (Box::new(store.clone()), Box::new(store))
}

#[cfg(feature = "storage-rocksdb")]
fn open_settings_store(
    db_path: Option<&Path>,
    fixture: &ServiceFixture,
) -> Result<(SettingsStoreBox, SettingsStoreBox)> {
    match db_path {
        Some(path) => {
            let store = RocksDBSettingsStore::open(path).into_diagnostic()?;
            Ok(store_pair(store))
        }
        None => Ok(store_pair(InMemorySettingsStore::with_settings(
            fixture.saved_settings.clone(),
        ))),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_settings_store(
    db_path: Option<&Path>,
    fixture: &ServiceFixture,
) -> Result<(SettingsStoreBox, SettingsStoreBox)> {
    if db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(store_pair(InMemorySettingsStore::with_settings(
        fixture.saved_settings.clone(),
    )))
}
