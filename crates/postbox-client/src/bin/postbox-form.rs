use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::info;

use postbox_client::{HttpApi, MessageForm, Route, Shell, SubmitStatus};
use postbox_types::validation::Field;

const BACK: &str = ":back";
const QUIT: &str = ":quit";
const CLEAR: &str = ":clear";

enum Step {
    Continue,
    Quit,
}

/// What one line typed at a field prompt means.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Back,
    /// Empty line: keep the current value.
    Keep,
    Clear,
    Set(String),
}

fn parse_input(line: String) -> Input {
    match line.as_str() {
        QUIT => Input::Quit,
        BACK => Input::Back,
        CLEAR => Input::Clear,
        "" => Input::Keep,
        _ => Input::Set(line),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postbox_form=info,postbox_client=info".into()),
        )
        .init();

    let base_url =
        std::env::var("POSTBOX_API_URL").unwrap_or_else(|_| "http://localhost:5000".into());
    let api = HttpApi::new(base_url.as_str())?;
    info!("Submitting to {}", api.messages_url());

    let mut shell = Shell::new();
    let mut form = MessageForm::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let step = match shell.route() {
            Route::Welcome => welcome(&mut shell, &mut lines).await?,
            Route::Form => form_view(&mut shell, &mut form, &api, &mut lines).await?,
        };
        if let Step::Quit = step {
            break;
        }
    }

    Ok(())
}

async fn welcome(shell: &mut Shell, lines: &mut Lines<BufReader<Stdin>>) -> Result<Step> {
    println!();
    println!("Welcome!");
    println!("Send us a message and we will get back to you.");
    println!("  * Fast message delivery");
    println!("  * Safe data storage");
    println!("  * Simple interface");
    let Some(input) = prompt(lines, "Press Enter to continue (:quit to exit) ").await? else {
        return Ok(Step::Quit);
    };
    if input == QUIT {
        return Ok(Step::Quit);
    }
    shell.proceed();
    Ok(Step::Continue)
}

async fn form_view(
    shell: &mut Shell,
    form: &mut MessageForm,
    api: &HttpApi,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<Step> {
    form.expire_status();
    println!();
    println!("Send a message  ({} to go back, {} to exit)", BACK, QUIT);
    println!("Press Enter to keep a value, type {} to empty it.", CLEAR);
    match form.status() {
        Some(SubmitStatus::Success) => println!("[ok] Message sent successfully!"),
        Some(SubmitStatus::Failure) => println!("[!] Sending failed. Please try again."),
        None => {}
    }

    for field in Field::ALL {
        if let Some(error) = form.error(field) {
            println!("  {}: {}", label(field), error);
        }
        let current = form.value(field).to_string();
        let question = if current.is_empty() {
            format!("{} *: ", label(field))
        } else {
            format!("{} * [{}]: ", label(field), current)
        };

        let Some(input) = prompt(lines, &question).await? else {
            return Ok(Step::Quit);
        };
        match parse_input(input) {
            Input::Quit => return Ok(Step::Quit),
            Input::Back => {
                shell.back();
                return Ok(Step::Continue);
            }
            Input::Keep => {}
            Input::Clear => form.set_field(field, ""),
            Input::Set(value) => form.set_field(field, value),
        }
    }

    println!("Sending...");
    if !form.submit(api).await {
        println!("Please fix the highlighted fields.");
    }
    Ok(Step::Continue)
}

fn label(field: Field) -> &'static str {
    match field {
        Field::Name => "Name",
        Field::Phone => "Phone (+375XXXXXXXXX or 80XXXXXXXXX)",
        Field::Message => "Message",
    }
}

/// Print `question` and read one line; `None` on end of input.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, question: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?.map(|l| l.trim_end_matches('\r').to_string()))
}
