//! Topic help for the CLI: input format, column pairs, model terms and configuration

use crate::config::env::EnvManager;
use colored::*;

/// Topics accepted by `--help-topic`
pub const HELP_TOPICS: &[&str] = &["input", "columns", "model", "config", "output", "examples"];

/// Help text renderer for the CLI application
#[derive(Debug, Default)]
pub struct HelpSystem;

impl HelpSystem {
    pub fn new() -> Self {
        Self
    }

    /// Overview with usage, examples and the list of topics
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();
        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_footer(use_colors));
        help
    }

    /// Display help for a single topic, `None` for unknown topics
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.trim().to_lowercase().as_str() {
            "input" | "file" => Some(self.format_input_help(use_colors)),
            "columns" => Some(self.format_columns_help(use_colors)),
            "model" | "usl" => Some(self.format_model_help(use_colors)),
            "config" | "configuration" | "env" => Some(self.format_configuration_help(use_colors)),
            "output" | "format" => Some(self.format_output_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "USL Planner";
        let subtitle = "Fit the Universal Scalability Law to load-test measurements";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!("{}\n{}\nVersion: {}\n", title.bright_cyan().bold(), subtitle.bright_blue(), version.green())
        } else {
            format!("{}\n{}\nVersion: {}\n", title, subtitle, version)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let mut usage = format!("{}\n", section_header("USAGE:", use_colors));
        for pattern in ["usl [OPTIONS] <INPUT>", "usl [OPTIONS] -", "usl --help-topic <TOPIC>"] {
            usage.push_str(&format!("  {}\n", paint(pattern, use_colors, |s| s.bright_white())));
        }
        usage
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Fit a load test",
                command: "usl bench.csv",
                description: "Rows of concurrency,throughput; prints the fitted model and its limits",
            },
            ExampleHelp {
                title: "Predict beyond the measured range",
                command: "usl bench.csv --predict 64 --predict 128",
                description: "Adds expected throughput and latency at 64 and 128 workers",
            },
            ExampleHelp {
                title: "Latency measurements from a pipe",
                command: "cat latency.txt | usl - --columns concurrency-latency --format json",
                description: "Reads concurrency/latency pairs from stdin and emits JSON",
            },
        ];

        let mut output = format!("{}\n", section_header("EXAMPLES:", use_colors));
        for example in &examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_footer(&self, use_colors: bool) -> String {
        let mut footer = format!("{}\n", section_header("ADDITIONAL HELP:", use_colors));
        for topic in HELP_TOPICS {
            let command = format!("--help-topic {}", topic);
            footer.push_str(&format!("  {}\n", paint(&command, use_colors, |s| s.bright_yellow())));
        }
        footer
    }

    fn format_input_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", section_header("INPUT FORMAT:", use_colors));
        help.push_str("One measurement per line: two numbers separated by a comma, semicolon or whitespace.\n");
        help.push_str("Lines starting with '#' and blank lines are ignored, and a first line that is not\n");
        help.push_str("numeric is treated as a header. Use '-' as the path to read from stdin.\n\n");
        help.push_str("At least 6 measurements spanning 3 or more distinct concurrency levels are needed.\n");
        help.push_str("Include a measurement at concurrency 1: single-worker throughput is estimated\n");
        help.push_str("from the lowest-concurrency row.\n");
        help
    }

    fn format_columns_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", section_header("COLUMN PAIRS:", use_colors));
        let pairs = [
            ("concurrency-throughput", "N and X; latency R = N / X (default)"),
            ("concurrency-latency", "N and R; throughput X = N / R"),
            ("throughput-latency", "X and R; concurrency N = X * R"),
        ];
        for (name, description) in pairs {
            help.push_str(&format!("  {:<24} {}\n", paint(name, use_colors, |s| s.bright_cyan()), description));
        }
        help.push_str("\nThe missing quantity is derived with Little's Law (N = X * R).\n");
        help
    }

    fn format_model_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", section_header("THE MODEL:", use_colors));
        help.push_str("  X(N) = λN / (1 + σ(N-1) + κN(N-1))\n\n");
        help.push_str("  σ  contention: cost of serializing on shared resources\n");
        help.push_str("  κ  coherency: cost of keeping shared state consistent between workers\n");
        help.push_str("  λ  throughput of a single worker\n\n");
        help.push_str("Throughput peaks at N = floor(sqrt((1-σ)/κ)). With κ = 0 it never declines\n");
        help.push_str("and the model is reported as limitless.\n");
        help
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", section_header("CONFIGURATION REFERENCE:", use_colors));
        help.push_str(&EnvManager::display_env_help());
        help.push_str("\nExample .env file:\n");
        help.push_str(&EnvManager::create_example_env_content());
        help
    }

    fn format_output_help(&self, use_colors: bool) -> String {
        let mut help = format!("{}\n\n", section_header("OUTPUT:", use_colors));
        help.push_str("  text  Model parameters, limits, goodness of fit and predictions (default)\n");
        help.push_str("  json  The same report as pretty-printed JSON\n\n");
        help.push_str("Logs go to stderr; --verbose shows fit progress, --debug emits JSON log lines.\n");
        help.push_str("Exit codes: 1 configuration/parse, 2 bad or insufficient data, 3 fit failure, 5 I/O.\n");
        help
    }
}

fn section_header(title: &str, use_colors: bool) -> String {
    paint(title, use_colors, |s| s.bright_green().bold())
}

fn paint<F>(text: &str, use_colors: bool, style: F) -> String
where
    F: Fn(&str) -> ColoredString,
{
    if use_colors {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Helper struct for formatting examples
struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!(
                "  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}
