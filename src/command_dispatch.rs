//! Purpose: Hold top-level CLI command dispatch for `filmliste`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Rows are written only after the whole feed decoded successfully.
//! Invariants: Defaulted fields surface as a stderr notice, never as a failure.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "filmliste", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_json(json!({
                "name": "filmliste",
                "version": env!("CARGO_PKG_VERSION"),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Inspect { input } => {
            let raw = read_feed(&input)?;
            let options = ImportOptions::default();
            let text = std::str::from_utf8(&raw).map_err(|err| {
                Error::new(ErrorKind::Format)
                    .with_message("movie list is not valid UTF-8")
                    .with_path(&input)
                    .with_source(err)
            })?;
            let metadata = filmliste::api::decode_metadata(
                text,
                &options.header_key,
                &options.entry_key,
            )
            .map_err(|err| err.with_path(&input))?;
            emit_json(metadata_json(&metadata));
            Ok(RunOutcome::ok())
        }
        Command::Import {
            input,
            out,
            strict_version,
            max_issues,
            known_channels,
            known_topics,
            only_new_names,
        } => {
            if only_new_names && out.is_none() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("--only-new-names requires --out")
                    .with_hint("Pass --out <dir> to write rows."));
            }
            let options = ImportOptions {
                strict_version,
                max_issues,
                known_channels: load_known(known_channels.as_deref())?,
                known_topics: load_known(known_topics.as_deref())?,
                ..ImportOptions::default()
            };
            let raw = read_feed(&input)?;
            let batch = match out {
                Some(dir) => {
                    let mut loader = JsonlLoader::new(dir).only_new_names(only_new_names);
                    import_into(&raw, &options, &mut loader)
                }
                None => import(&raw, &options),
            }
            .map_err(|err| {
                if err.path().is_some() {
                    err
                } else {
                    err.with_path(&input)
                }
            })?;

            if let Some(notice) = degrade_notice(
                &batch.report,
                "import",
                &input_label(&input),
                notice_time_now(),
            ) {
                emit_notice(&notice);
            }
            emit_json(summary_json(&batch));
            Ok(RunOutcome::ok())
        }
    }
}
