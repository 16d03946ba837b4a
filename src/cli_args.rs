use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "llama-query",
    version,
    about = "Query a local llama-server and render the answer for the terminal"
)]
pub struct Cli {
    /// Prompt text; multiple words are joined with spaces.
    #[arg(required_unless_present = "check")]
    pub prompt: Vec<String>,

    /// System message for the chat template.
    #[arg(long, short = 's')]
    pub system: Option<String>,

    /// Sampling temperature [default: 0.7]
    #[arg(long = "temp", short = 't')]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate (server default when omitted).
    #[arg(long, short = 'n')]
    pub tokens: Option<u32>,

    /// Output width in columns [default: 80]
    #[arg(long, short = 'w')]
    pub width: Option<usize>,

    /// Ask for and display the model's thinking process.
    #[arg(long)]
    pub think: bool,

    #[arg(long)]
    pub no_color: bool,

    /// Show token counts and timing information.
    #[arg(long, short = 'c')]
    pub counts: bool,

    /// Trim echoed prompts and repeated paragraphs from the answer.
    #[arg(long)]
    pub clean: bool,

    /// Print the content without any formatting.
    #[arg(long, short = 'r', conflicts_with = "json")]
    pub raw: bool,

    /// Print the full server payload as JSON.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// llama-server base URL [default: http://localhost:8080]
    #[arg(long, env = "LLAMA_QUERY_URL")]
    pub url: Option<String>,

    /// Request timeout in seconds, 0 disables it [default: 60]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Top-k sampling [default: 40]
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Top-p sampling [default: 0.9]
    #[arg(long)]
    pub top_p: Option<f64>,

    /// JSON or YAML file with default settings.
    #[arg(long, env = "LLAMA_QUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Check that the server is reachable and exit.
    #[arg(long)]
    pub check: bool,

    /// Debug logging on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }
}
