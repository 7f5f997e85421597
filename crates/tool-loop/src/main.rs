//! A simple program demonstrates how to use `tool-loop` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::sync::mpsc;
use tool_loop::SessionBuilder;
use tool_loop::core::model::ModelResponse;
use tool_loop_openai_model::{
    OpenAIConfig, OpenAIConfigBuilder, OpenAIProvider,
};

enum StepEvent {
    Reasoning(String),
    ToolCall { name: String, arguments: String },
}

const BAR_CHAR: &str = "▎";
const COMPACT_COMMAND: &str = "/compact";

/// Short names for the Workers AI models that support tool calling.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("glm-4.7-flash", "workers-ai/@cf/zai-org/glm-4.7-flash"),
    (
        "llama-4-scout-17b-16e-instruct",
        "workers-ai/@cf/meta/llama-4-scout-17b-16e-instruct",
    ),
    ("qwen3-30b-a3b-fp8", "workers-ai/@cf/qwen/qwen3-30b-a3b-fp8"),
];

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };
    let Ok(model) = env::var("OPENAI_MODEL") else {
        eprintln!("OPENAI_MODEL environment variable is not set");
        return;
    };

    let config = build_config(api_key, env::var("OPENAI_BASE_URL").ok());
    let model_provider = OpenAIProvider::new(config);
    debug!("using {:?}", model_provider.config());

    let enable_shell = env::var("TOOL_LOOP_ENABLE_SHELL")
        .is_ok_and(|v| matches!(v.as_str(), "1" | "true" | "yes"));
    let cwd = env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "/".to_owned());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session = SessionBuilder::with_model_provider(model_provider, model)
        .with_instruction(
            include_str!("./system_prompt.md")
                .replace("{{HOST_OS}}", host_os())
                .replace("{{CWD}}", &cwd),
        )
        .with_shell(enable_shell)
        .on_step_end(move |resp, _| send_step_events(&event_tx, resp))
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut stdin = BufReader::new(io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message("🤔 Thinking...");
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        let result = {
            let mut task = pin!(async {
                if line == COMPACT_COMMAND {
                    session.compact().await.map(|compacted| {
                        Some(if compacted {
                            "Conversation compacted.".to_owned()
                        } else {
                            "Nothing to compact.".to_owned()
                        })
                    })
                } else {
                    session.send_message(line).await
                }
            });
            loop {
                select! {
                    result = &mut task => break result,
                    Some(event) = event_rx.recv() => {
                        progress_bar.suspend(|| print_step_event(event));
                    }
                }
            }
        };

        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();
        while let Ok(event) = event_rx.try_recv() {
            print_step_event(event);
        }

        match result {
            Ok(Some(reply)) => {
                println!("{}🤖 {}", BAR_CHAR.bright_cyan(), reply.bright_white());
            }
            Ok(None) => {
                println!(
                    "{}{}",
                    BAR_CHAR.bright_yellow(),
                    "The model did not reply.".bright_black()
                );
            }
            Err(err) => {
                eprintln!("{}❌ {}", BAR_CHAR.bright_red(), err.bright_red());
            }
        }
    }
}

fn build_config(api_key: String, base_url: Option<String>) -> OpenAIConfig {
    let mut config = OpenAIConfigBuilder::with_api_key(api_key);
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    MODEL_ALIASES
        .iter()
        .fold(config, |config, &(alias, model)| {
            config.with_model_alias(alias, model)
        })
        .build()
}

fn send_step_events(
    event_tx: &mpsc::UnboundedSender<StepEvent>,
    resp: &ModelResponse,
) {
    for choice in &resp.choices {
        if let Some(reasoning) = &choice.message.reasoning {
            event_tx.send(StepEvent::Reasoning(reasoning.clone())).ok();
        }
        for call in &choice.message.tool_calls {
            event_tx
                .send(StepEvent::ToolCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                })
                .ok();
        }
    }
}

fn print_step_event(event: StepEvent) {
    match event {
        StepEvent::Reasoning(reasoning) => {
            println!("{}💭 {}", BAR_CHAR.bright_black(), reasoning.bright_black());
        }
        StepEvent::ToolCall { name, arguments } => {
            println!(
                "{}🔧 {} {}",
                BAR_CHAR.bright_magenta(),
                name.bright_white().bold(),
                arguments.bright_black()
            );
        }
    }
}

async fn read_line(stdin: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match stdin.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

#[inline]
fn host_os() -> &'static str {
    let os = std::env::consts::OS;
    match os {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        _ => "some other OS",
    }
}
