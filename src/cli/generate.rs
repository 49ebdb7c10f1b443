//! Generate command - build a request, submit it and wait for the video

use crate::cli::download::save_video;
use crate::cli::form::{
    FormInput, confirm_submit, form_from_input, interactive_form, print_notices, print_request,
    reject_discarded_references,
};
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::println;
use reelgen::api::create_generation_service;
use reelgen::config::Config;
use reelgen::constraints::validate;
use reelgen::error::Result;
use reelgen::generate::{Generator, NoopProgress, build_payload};
use std::path::PathBuf;

/// How the generate command should behave once the form is filled in
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Ask for every field instead of relying on flags
    pub interactive: bool,
    /// Print the request without sending it
    pub dry_run: bool,
    /// Return as soon as the service accepts the request
    pub no_wait: bool,
    /// Where to save the finished video
    pub output: Option<PathBuf>,
    /// Extra progress output
    pub verbose: bool,
}

/// Run the generate command
pub async fn run_generate(
    config: &Config,
    input: &FormInput,
    options: &GenerateOptions,
) -> Result<()> {
    let interactive = options.interactive || input.prompt.is_none();
    let state = if interactive {
        interactive_form(input).await?
    } else {
        let (state, notices) = form_from_input(input).await?;
        print_notices(&notices);
        reject_discarded_references(&notices)?;
        state
    };

    let locks = state.locks();
    let request = state.into_request();
    validate(&request)?;

    print_request(&request, &locks);

    if options.dry_run {
        println!(
            "{} POST {}",
            "Dry run, would send:".emphasis(),
            config.endpoint("/generate").accent()
        );
        for field in build_payload(&request) {
            println!("  {field}");
        }
        return Ok(());
    }

    if interactive && !confirm_submit()? {
        println!("{}", "Cancelled".muted());
        return Ok(());
    }

    let service = create_generation_service(config)?;
    let generator = Generator::new(service.as_ref());

    if options.no_wait {
        let operation = generator.submit(&request, &NoopProgress).await?;
        println!("{} Submitted as {}", check(), operation.accent());
        println!(
            "{}",
            format!("Run `reelgen wait {operation}` to follow it").muted()
        );
        return Ok(());
    }

    let progress = CliProgress::new(options.verbose);
    let result = generator.run(&request, &progress).await?;
    let url = result.into_video_url()?;

    if let Some(output) = &options.output {
        let path = save_video(service.as_ref(), &url, Some(output)).await?;
        println!("{} Saved to {}", check(), path.display().accent());
    }

    Ok(())
}
