use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

use crate::auth::Whitelist;
use crate::error::ConfigError;
use crate::logging::LogTarget;
use crate::routes::RouteSource;
use crate::substitute::SubstitutionConfig;

pub const DEFAULT_REPLACE_PATTERN: &str = "^[ a-zA-Z0-9/-]*$";

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "cmd-gateway")]
#[command(about = "Runs preconfigured shell commands when their URL is requested")]
pub struct Args {
    // Port to listen on
    #[arg(long, default_value_t = 4870)]
    pub port: u16,

    // IP to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub ip: String,

    // IPs allowed to trigger commands, comma-separated. "" disables the check
    // Example: "1.1.1.1,3.3.3.3"
    #[arg(long = "allowedips", default_value = "127.0.0.1")]
    pub allowed_ips: String,

    // CSV file of path,command rows
    #[arg(long)]
    pub routes: Option<PathBuf>,

    // "stdout" or a file to append to
    #[arg(long, default_value = "stdout")]
    pub log: String,

    // Log filter directive, RUST_LOG wins when set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    // Static command served on /do, --routes is ignored when set
    #[arg(long)]
    pub cmd: Option<String>,

    // Answer with the command's stdout/stderr instead of OK/ERR
    #[arg(long = "returnresult")]
    pub return_result: bool,

    // Requests allowed per URL per minute, 0 = unlimited
    #[arg(long = "maxratelimit", default_value_t = 10)]
    pub max_rate_limit: u32,

    // Replace $-prefixed GET parameters inside the command
    #[arg(long = "replaceparam")]
    pub replace_param: bool,

    // Characters a replacement value may consist of
    #[arg(long = "replaceregex", default_value = DEFAULT_REPLACE_PATTERN)]
    pub replace_regex: String,

    // Skip bad GET parameters instead of failing the request
    #[arg(long = "nostop")]
    pub no_stop: bool,
}

impl Args {
    pub fn route_source(&self) -> Result<RouteSource, ConfigError> {
        if let Some(cmd) = self.cmd.as_deref().filter(|c| !c.is_empty()) {
            return Ok(RouteSource::Static(cmd.to_string()));
        }
        match &self.routes {
            Some(path) if !path.as_os_str().is_empty() => Ok(RouteSource::Csv(path.clone())),
            _ => Err(ConfigError::NoRouteSource),
        }
    }

    pub fn log_target(&self) -> LogTarget {
        if self.log == "stdout" {
            LogTarget::Stdout
        } else {
            LogTarget::File(PathBuf::from(&self.log))
        }
    }
}

/// Runtime configuration, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub ip: String,
    pub port: u16,
    pub whitelist: Whitelist,
    pub return_result: bool,
    pub rate_limit: u32,
    pub substitution: SubstitutionConfig,
}

impl TryFrom<&Args> for Config {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        // the value has to match as a whole, not just contain a match
        let pattern = Regex::new(&format!("^(?:{})$", args.replace_regex))?;

        Ok(Self {
            ip: args.ip.clone(),
            port: args.port,
            whitelist: Whitelist::from_list(&args.allowed_ips),
            return_result: args.return_result,
            rate_limit: args.max_rate_limit,
            substitution: SubstitutionConfig {
                enabled: args.replace_param,
                pattern,
                continue_on_error: args.no_stop,
            },
        })
    }
}
