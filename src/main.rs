use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use indicatif::ProgressBar;
use uuid::Uuid;

mod apply;
mod cli;
mod config;
mod errors;
mod extract;
mod generate;
mod log;
mod prompt;
mod provider;
mod scaffold;
mod server;
mod usage;
mod ux;
mod wire;

use generate::Generator;
use usage::UsageCounter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = cli::Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut cfg = config::Config::load(args.config.as_deref())?;
    if let Some(bind) = &args.bind {
        cfg.bind = bind.clone();
    }
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }

    let counter = Arc::new(UsageCounter::new(cfg.request_limit));
    let provider = provider::make_provider(&cfg)?;
    if provider.is_none() {
        tracing::warn!("AIMLAPI_KEY not set; running in degraded template-only mode");
    }
    let generator = Arc::new(Generator::new(&cfg, provider, counter));

    if args.serve {
        server::serve(&cfg.bind, generator).await?;
        return Ok(());
    }

    let Some(task) = args.task.clone() else {
        anyhow::bail!("nothing to do: pass --task <prompt> or --serve");
    };

    let req = wire::GenerateRequest {
        prompt: task,
        model: args.model.clone(),
        context: None,
        files: None,
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(if generator.degraded() {
        "rendering local scaffold..."
    } else {
        "generating with AIMLAPI..."
    });
    spinner.enable_steady_tick(Duration::from_millis(120));
    let outcome = generator.generate(&req).await;
    spinner.finish_and_clear();
    let resp = outcome?;

    if args.save_request || args.save_response {
        let tx = Uuid::new_v4();
        let saved = log::save_generation(
            Path::new("."),
            tx,
            &req,
            &resp,
            args.save_request,
            args.save_response,
        )?;
        if args.debug {
            log::print_saved_paths(&saved);
        }
    }

    ux::show_file_set(&resp);

    match &args.out {
        Some(out) => {
            let root = Path::new(out);
            let go = args.auto_approve
                || ux::confirm(&format!("Write {} files under {}?", resp.files.len(), out));
            if go {
                let summary = apply::write_file_set(root, &resp.files, args.dry_run)?;
                ux::print_apply_dashboard(&summary);
            } else {
                println!("Aborted by user.");
            }
        }
        None => {
            println!("=== PRIMARY FILE ===\n{}\n", resp.code);
        }
    }

    Ok(())
}
