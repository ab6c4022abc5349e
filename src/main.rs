// SPDX-License-Identifier: MPL-2.0
use dossier_lens::app::{self, paths, Flags};
use dossier_lens::dossier::DossierParams;

const USAGE: &str = "\
Usage: dossier_lens [OPTIONS]

Options:
  --key <KEY>           Dossier key
  --package <PACKAGE>   Dossier package
  --code <CODE>         Dossier code
  --mode <MODE>         Dossier mode
  --external <URI>      External dossier to import from
  --filter <CODES>      Comma-separated codes of the files to show
  --read-only           Hide the upload controls
  --base-url <URL>      File service base URL
  --lang <LANG>         Interface language (e.g. en-US, ru)
  --config-dir <DIR>    Directory holding settings.toml
  -h, --help            Print this help
";

fn parse_flags(mut args: pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    let params = DossierParams {
        dossier_key: args.opt_value_from_str("--key")?.unwrap_or_default(),
        dossier_package: args.opt_value_from_str("--package")?.unwrap_or_default(),
        dossier_code: args.opt_value_from_str("--code")?.unwrap_or_default(),
        dossier_mode: args.opt_value_from_str("--mode")?.unwrap_or_default(),
        external_dossier: args.opt_value_from_str("--external")?,
    };
    let flags = Flags {
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        base_url: args.opt_value_from_str("--base-url")?,
        read_only: args.contains("--read-only"),
        filter: args.opt_value_from_str("--filter")?,
        params,
    };

    let rest = args.finish();
    if !rest.is_empty() {
        log::warn!("ignoring unexpected arguments: {rest:?}");
    }
    Ok(flags)
}

fn main() -> iced::Result {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{USAGE}");
        return Ok(());
    }

    let flags = match parse_flags(args) {
        Ok(flags) => flags,
        Err(error) => {
            eprintln!("error: {error}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());
    app::run(flags)
}
