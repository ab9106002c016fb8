use clap::Args;
use engine_runtime::execution::settings::{
    DEFAULT_FILE_SIZE, DEFAULT_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_QUERY, DEFAULT_URL,
    ExportSettings,
};
use std::ffi::OsString;

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(short, long, default_value = DEFAULT_URL, help = "Solr server URL")]
    pub url: String,

    #[arg(short, long, default_value = DEFAULT_QUERY, help = "Solr query, passed through unchanged")]
    pub query: String,

    #[arg(short, long, default_value_t = DEFAULT_LIMIT, help = "Max records, 0 = unlimited")]
    pub limit: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, help = "Number of records per query (-qs)")]
    pub qsize: i64,

    #[arg(long, default_value_t = DEFAULT_FILE_SIZE, help = "Number of records per file (-js)")]
    pub jsize: i64,

    #[arg(
        short,
        long,
        help = "File output basename; number and .mrc extension are appended"
    )]
    pub base: Option<String>,

    #[arg(short, long, help = "Delay in seconds between queries")]
    pub delay: Option<f64>,

    #[arg(short, long, help = "Use jittered delays")]
    pub paranoid: bool,
}

impl From<ExportArgs> for ExportSettings {
    fn from(args: ExportArgs) -> Self {
        ExportSettings {
            url: args.url,
            query: args.query,
            limit: args.limit,
            page_size: args.qsize,
            file_size: args.jsize,
            base: args.base,
            delay: args.delay,
            paranoid: args.paranoid,
        }
    }
}

/// Two-letter single-dash flags and the long options they stand for.
const LEGACY_FLAGS: [(&str, &str); 2] = [("-qs", "--qsize"), ("-js", "--jsize")];

/// Rewrites `-qs`/`-js` (and their `=value` forms) to the long options.
///
/// Without this, `-qs 5` would parse as `-q s` followed by a stray `5`.
/// Arguments after `--` are left alone.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            for (short, long) in LEGACY_FLAGS {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text
                    .strip_prefix(short)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}
