use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::processors::{Pipeline, PipelineOptions};
use crate::server::{self, ServerOptions};
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Transform {
            input,
            output_dir,
            profile,
            header_row,
            sheet,
            sentinel,
            no_summary,
            validate_only,
        } => {
            let pipeline_settings = &mut settings.pipeline;
            if let Some(input) = input {
                pipeline_settings.input = input;
            }
            if let Some(output_dir) = output_dir {
                pipeline_settings.output_dir = output_dir;
            }
            if let Some(profile) = profile {
                pipeline_settings.profile = profile;
            }
            if header_row.is_some() {
                pipeline_settings.header_row = header_row;
            }
            if sheet.is_some() {
                pipeline_settings.sheet = sheet;
            }
            if let Some(sentinel) = sentinel {
                pipeline_settings.sentinel = sentinel;
            }
            if no_summary {
                pipeline_settings.write_summary = false;
            }

            let profile = settings.profile()?;
            let pipeline_settings = &settings.pipeline;

            println!("Transforming turbine registry...");
            println!("Input file: {}", pipeline_settings.input.display());
            println!("Output directory: {}", pipeline_settings.output_dir.display());
            println!(
                "Profile: {} (header row {})",
                profile.name,
                profile.header_row + 1
            );

            let options = PipelineOptions::new(profile, &pipeline_settings.output_dir)
                .with_sheet(pipeline_settings.sheet.clone())
                .with_sentinel(&pipeline_settings.sentinel)
                .with_summary(pipeline_settings.write_summary)
                .with_validate_only(validate_only);

            let progress = ProgressReporter::new_spinner("Transforming...", cli.quiet);
            let report = Pipeline::new(options).run(&pipeline_settings.input, &progress)?;
            progress.finish_with_message(&format!(
                "Exported {} turbines",
                report.records_exported
            ));

            println!("\n{}", report.summary());

            if validate_only {
                println!("Validation complete - no output files written");
            } else {
                println!("Transformation complete!");
            }
        }

        Commands::Serve {
            host,
            port,
            web_root,
            data_dir,
        } => {
            let server_settings = settings.server;
            let options = ServerOptions {
                host: host.unwrap_or(server_settings.host),
                port: port.unwrap_or(server_settings.port),
                web_root: web_root.unwrap_or(server_settings.web_root),
                data_dir: data_dir.unwrap_or(server_settings.data_dir),
            };

            server::serve(options).await?;
        }
    }

    Ok(())
}
