mod api;
mod cli;
mod core;
mod error;
mod notifier;
mod prelude;
mod quantity;
mod scheduler;
mod tables;

use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, crate_version};

use crate::{
    cli::Args,
    core::pipeline::{Outcome, Pipeline, report},
    notifier::Notifier,
    prelude::*,
    scheduler::Scheduler,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let notifier = args.notifications.build_notifier(args.octopus.request_timeout())?;

    if args.run.one_off {
        notifier.notify("Welcome to Tariff Hopper. Executing a one-off comparison.").await;
        let is_succeeded = run_tariff_compare(&args, &notifier).await;
        info!(is_succeeded, "done!");
        Ok(if is_succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    } else {
        let execution_time = args.run.execution_time;
        notifier
            .notify(&format!(
                "Welcome to Tariff Hopper. I will run your comparisons at {}",
                execution_time.format("%H:%M"),
            ))
            .await;
        Scheduler::new(&notifier, execution_time, args.run.state_file.clone())?
            .run_forever(|| async {
                run_tariff_compare(&args, &notifier).await;
            })
            .await;
        Ok(ExitCode::SUCCESS)
    }
}

/// Run the comparison once, reporting any failure through the notifier.
async fn run_tariff_compare(args: &Args, notifier: &Notifier) -> bool {
    report(compare_and_switch(args, notifier).await, notifier).await
}

#[instrument(skip_all)]
async fn compare_and_switch(args: &Args, notifier: &Notifier) -> Result<Outcome> {
    let octopus = args.octopus.connect().await?;
    let switcher = args.switch.sign_up_command(&args.octopus.account_number);
    Pipeline::builder()
        .provider(&octopus)
        .switcher(&switcher)
        .notifier(notifier)
        .candidates(args.run.tariffs())
        .dry_run(args.run.dry_run)
        .cooldown(args.switch.cooldown())
        .build()
        .compare_and_switch(Local::now().date_naive())
        .await
}
