mod notifications;
mod octopus;
mod run;
mod switch;

use clap::Parser;

pub use self::{
    notifications::NotificationArgs,
    octopus::OctopusArgs,
    run::RunArgs,
    switch::SwitchArgs,
};

#[derive(Parser)]
#[command(author, version, about)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub octopus: OctopusArgs,

    #[clap(flatten)]
    pub run: RunArgs,

    #[clap(flatten)]
    pub notifications: NotificationArgs,

    #[clap(flatten)]
    pub switch: SwitchArgs,
}
