use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Tutor proxy: AI tutor chat and provider status over HTTP
#[derive(Debug, Parser)]
#[command(name = "tutor-proxy")]
#[command(version)]
#[command(about = "AI tutor chat proxy for Gemini and Groq", long_about = None)]
pub struct Args {
    /// Config file (default: $TUTOR_PROXY_HOME/config/config.toml or ~/.config/tutor-proxy/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Listen address (default: config/bind or 127.0.0.1:3000)
    #[arg(long = "bind", value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default)
    Serve,

    /// Check whether a provider is reachable and print the result as JSON
    Status {
        #[arg(long = "provider", value_enum, default_value_t = StatusTarget::Gemini)]
        provider: StatusTarget,
    },

    /// Ask the tutor one question and print the reply
    Ask {
        /// Message text
        #[arg(value_name = "MESSAGE", required = true)]
        message: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusTarget {
    Gemini,
    Groq,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let args = Args::try_parse_from(["tutor-proxy", "--bind", "0.0.0.0:9000"]).unwrap();
        assert!(args.cmd.is_none());
        assert_eq!(args.bind.unwrap().port(), 9000);
    }

    #[test]
    fn status_takes_provider() {
        let args = Args::try_parse_from(["tutor-proxy", "status", "--provider", "groq"]).unwrap();
        assert!(matches!(
            args.cmd,
            Some(Command::Status {
                provider: StatusTarget::Groq
            })
        ));
    }

    #[test]
    fn ask_joins_words() {
        let args = Args::try_parse_from(["tutor-proxy", "ask", "what", "is", "math"]).unwrap();
        let Some(Command::Ask { message }) = args.cmd else {
            panic!("expected ask");
        };
        assert_eq!(message.join(" "), "what is math");
    }
}
