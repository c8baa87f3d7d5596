mod args;
mod survey;

use clap::Parser;
use log::debug;

use crate::args::Args;
use crate::survey::{run_survey, RunOptions, SurveyAppError};

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    let opts = RunOptions {
        config_path: args.config,
        input: args.input,
        sheet_name: args.sheet,
        out: args.out,
        reference: args.reference,
    };

    if let Err(e) = run_survey(&opts) {
        match &e {
            SurveyAppError::Survey { source } if !source.is_user_correctable() => {
                eprintln!("An internal error occured: {}", e);
            }
            _ => {
                eprintln!("An error occured: {}", e);
            }
        }
        std::process::exit(1);
    }
}
