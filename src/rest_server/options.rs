use clap::Parser;

#[derive(Clone, Debug, Parser)]
pub struct RestServerOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[arg(short, long, default_value = "127.0.0.1")]
    pub bind: String,

    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}
