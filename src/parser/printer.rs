use crate::constant::*;
use crate::parser::base::OptionConfig;
use crate::parser::interface::UserInterface;

// We'll target 95% of the terminal width, to ensure the printer doesn't literally use
// the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_DESCRIPTION_WIDTH: usize = 17;

const FALLBACK_TOTAL_WIDTH: usize = 100;

// Renders the usage summary and help message from the declared option metadata.
pub(crate) struct Printer {
    options: Vec<(String, Option<char>, bool, Option<String>)>,
    usage: String,
    about: Option<String>,
    auto_help: bool,
    total_width: usize,
}

impl Printer {
    pub(crate) fn new(
        configs: &[OptionConfig],
        usage: &str,
        about: Option<&str>,
        auto_help: bool,
    ) -> Self {
        let total_width = match terminal_size::terminal_size() {
            Some((terminal_size::Width(width), _)) => width as usize,
            None => FALLBACK_TOTAL_WIDTH,
        };
        Self::with_width(configs, usage, about, auto_help, total_width)
    }

    pub(crate) fn with_width(
        configs: &[OptionConfig],
        usage: &str,
        about: Option<&str>,
        auto_help: bool,
        total_width: usize,
    ) -> Self {
        let mut options: Vec<(String, Option<char>, bool, Option<String>)> = configs
            .iter()
            .map(|config| {
                (
                    config.long().to_string(),
                    config.short_name(),
                    config.takes_value(),
                    config.description().map(|d| d.to_string()),
                )
            })
            .collect();
        options.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            options,
            usage: usage.to_string(),
            about: about.map(|d| d.to_string()),
            auto_help,
            total_width,
        }
    }

    fn summary(&self, program: &str) -> String {
        let mut pieces = Vec::default();

        if self.auto_help {
            pieces.push(format!("[-{HELP_SHORT}]"));
        }

        for (long, short, takes_value, _) in &self.options {
            let grammar = if *takes_value {
                format!(" {}", long.to_ascii_uppercase())
            } else {
                "".to_string()
            };
            match short {
                Some(s) => pieces.push(format!("[-{s}{grammar}]")),
                None => pieces.push(format!("[--{long}{grammar}]")),
            };
        }

        if !self.usage.is_empty() {
            pieces.push(self.usage.clone());
        }

        if pieces.is_empty() {
            format!("usage: {program}")
        } else {
            format!("usage: {program} {s}", s = pieces.join(" "))
        }
    }

    pub(crate) fn print_usage(&self, program: &str, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print_usage(self.summary(program));
    }

    pub(crate) fn print_help(&self, program: &str, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.summary(program));

        let target_total_width = std::cmp::max(
            (self.total_width as f64 * TARGET_TOTAL_FACTOR) as usize,
            MINIMUM_DESCRIPTION_WIDTH,
        );

        if let Some(about) = &self.about {
            user_interface.print("".to_string());

            for line in chunk(about, target_total_width) {
                user_interface.print(line);
            }
        }

        let help_flags = format!("-{HELP_SHORT}, --{HELP_NAME}");
        let mut rows: Vec<(String, Option<String>)> = Vec::default();

        if self.auto_help {
            rows.push((
                help_flags,
                Some("Show this help message and exit.".to_string()),
            ));
        }

        for (long, short, takes_value, description) in &self.options {
            let grammar = if *takes_value {
                format!(" {}", long.to_ascii_uppercase())
            } else {
                "".to_string()
            };
            let flags = match short {
                Some(s) => format!("-{s}, --{long}{grammar}"),
                None => format!("--{long}{grammar}"),
            };
            rows.push((flags, description.clone()));
        }

        if rows.is_empty() {
            return;
        }

        let column_width = rows
            .iter()
            .map(|(flags, _)| flags.len())
            .max()
            .expect("internal error - rows must be non-empty");
        let description_width = std::cmp::max(
            target_total_width.saturating_sub(column_width + 3),
            MINIMUM_DESCRIPTION_WIDTH,
        );

        user_interface.print("".to_string());
        user_interface.print("options:".to_string());

        for (flags, description) in rows {
            match description {
                Some(description) => {
                    for (i, part) in chunk(&description, description_width).iter().enumerate() {
                        if i == 0 {
                            user_interface.print(format!(" {flags:column_width$}  {part}"));
                        } else {
                            user_interface.print(format!(" {:column_width$}  {part}", ""));
                        }
                    }
                }
                None => {
                    user_interface.print(format!(" {flags}"));
                }
            }
        }
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
