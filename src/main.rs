mod app;
mod browser;
mod cloud_path;
mod config;
mod errors;
mod k8s;
mod resources;

use crate::app::Request;
use crate::app::RunError;
use crate::browser::BrowserOpener;
use crate::config::Settings;
use crate::k8s::KubeClusterApi;
use clap::CommandFactory;
use clap::Parser;
use clap::ValueEnum;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = "\
EXAMPLES:

   kubectl doweb service main-load-balancer
   kubectl doweb cluster

SUPPORTED TYPES:

   cluster, node (no), service (svc), persistentvolume (pv), persistentvolumeclaim (pvc)";

/// a kubectl plugin for opening DigitalOcean resources in a web browser
#[derive(Parser, Debug)]
#[command(
    name = "kubectl-doweb",
    version,
    about,
    override_usage = "kubectl doweb <TYPE> [NAME]",
    after_help = AFTER_HELP
)]
struct Args {
    /// Resource type, e.g. cluster, node, svc, pv, pvc
    #[arg(value_name = "TYPE")]
    kind: String,

    /// Name of the resource; not used for clusters
    name: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Kubernetes object namespace [default: namespace of the kubeconfig context]
    #[arg(short, long)]
    namespace: Option<String>,

    /// Log level for debugging; RUST_LOG takes precedence
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

async fn execute(args: Args) -> anyhow::Result<()> {
    let settings = Settings {
        kubeconfig: args.kubeconfig,
        context: args.context,
    };
    let api = KubeClusterApi::new(settings.kube_config().await?)?;

    let request = Request {
        kind: args.kind,
        name: args.name.unwrap_or_default(),
        namespace: args.namespace,
    };

    app::run(&api, &mut io::stderr(), &BrowserOpener, &request).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.log_level);

    match execute(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{:#}", error);

            let usage_error = error
                .downcast_ref::<RunError>()
                .is_some_and(RunError::is_usage_error);
            if usage_error {
                let _ = Args::command().print_help();
            }

            ExitCode::FAILURE
        }
    }
}
