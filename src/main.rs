use std::{path::Path, process};

use devguide::{
    application::{
        contact::{ContactConfig, ContactFormHandler, SubmitOutcome},
        error::AppError,
        preview::{CLEAR_PROMPT, LivePreviewEngine, compose_document},
        site::{PageElements, SiteApp, SiteConfig},
        status::StatusBoard,
    },
    config,
    domain::{
        contact::ContactFields,
        sources::SandboxSources,
        templates::{DEFAULT_MARKUP, DEFAULT_STYLE},
    },
    infra::{
        console::{Console, HELP, SandboxCommand},
        error::InfraError,
        surface::FileSurface,
        telemetry,
        watch::{SourcePaths, spawn_source_watcher},
    },
};
use tokio::{fs, io::AsyncWriteExt, runtime::Handle};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Sandbox(Box::<config::SandboxArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Render(args) => run_render(args).await,
        config::Command::Sandbox(args) => run_sandbox(settings, *args).await,
        config::Command::Contact(args) => run_contact(settings, args).await,
    }
}

async fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let markup = read_source(&args.markup).await?;
    let style = read_source(&args.style).await?;
    let artifact = compose_document(&markup, &style);

    match args.out {
        Some(path) => {
            fs::write(&path, artifact.document())
                .await
                .map_err(InfraError::from)?;
            info!(
                target: "devguide::render",
                path = %path.display(),
                bytes = artifact.len(),
                "Preview document written"
            );
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(artifact.document().as_bytes())
                .await
                .map_err(InfraError::from)?;
            stdout.flush().await.map_err(InfraError::from)?;
        }
    }

    Ok(())
}

async fn run_sandbox(settings: config::Settings, args: config::SandboxArgs) -> Result<(), AppError> {
    let paths = SourcePaths {
        markup: args.markup,
        style: args.style,
    };
    if args.example && !paths.is_empty() {
        return Err(AppError::validation(
            "`--example` cannot be combined with `--markup` or `--style`",
        ));
    }

    let seed = if args.example {
        SandboxSources::example()
    } else {
        seed_from_files(&paths).await?
    };

    let surface = FileSurface::new(settings.preview.output_dir.clone()).map_err(InfraError::from)?;
    info!(
        target: "devguide::sandbox",
        output_dir = %surface.root().display(),
        debounce = ?settings.preview.debounce,
        "Sandbox starting"
    );

    let site = SiteApp::build(
        PageElements {
            sandbox: Some(seed),
            ..PageElements::default()
        },
        surface,
        SiteConfig::from(&settings),
        Handle::current(),
    );
    let engine = site
        .sandbox()
        .cloned()
        .ok_or_else(|| AppError::unexpected("sandbox page has no preview engine"))?;

    let watcher = (!paths.is_empty())
        .then(|| spawn_source_watcher(engine.clone(), paths, settings.preview.poll_interval));

    print_preview(&engine);
    println!("{HELP}");

    let mut console = Console::stdin();
    while let Some(line) = console.next_line().await.map_err(InfraError::from)? {
        let command = match line.parse::<SandboxCommand>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                println!("{HELP}");
                continue;
            }
        };

        match command {
            SandboxCommand::Run => site.run_code(),
            SandboxCommand::Clear => {
                let confirmed = console
                    .confirm(CLEAR_PROMPT)
                    .await
                    .map_err(InfraError::from)?;
                if !site.clear_code(&confirmed) {
                    println!("clear cancelled");
                    continue;
                }
            }
            SandboxCommand::Example => site.load_example(),
            SandboxCommand::Show => {}
            SandboxCommand::Help => {
                println!("{HELP}");
                continue;
            }
            SandboxCommand::Quit => break,
        }

        print_preview(&engine);
    }

    if let Some(watcher) = watcher {
        watcher.abort();
        let _ = watcher.await;
    }

    info!(
        target: "devguide::sandbox",
        renders = engine.render_count(),
        "Sandbox finished"
    );
    Ok(())
}

async fn seed_from_files(paths: &SourcePaths) -> Result<SandboxSources, AppError> {
    let markup = match paths.markup.as_deref() {
        Some(path) => read_source(path).await?,
        None => DEFAULT_MARKUP.to_string(),
    };
    let style = match paths.style.as_deref() {
        Some(path) => read_source(path).await?,
        None => DEFAULT_STYLE.to_string(),
    };
    Ok(SandboxSources::new(markup, style))
}

fn print_preview(engine: &LivePreviewEngine) {
    match engine.current_handle() {
        Some(handle) => println!("preview: {handle}"),
        None => println!("preview: unavailable"),
    }
}

async fn run_contact(settings: config::Settings, args: config::ContactArgs) -> Result<(), AppError> {
    let handler = ContactFormHandler::new(
        ContactConfig::from(&settings.contact),
        StatusBoard::new(Handle::current()),
    );
    let fields = ContactFields::new(args.name, args.email, args.subject, args.message);

    let outcome = handler.submit(fields).await;
    if let Some(message) = handler.status().current() {
        println!("{}", message.text);
    }

    match outcome? {
        SubmitOutcome::Sent => Ok(()),
        SubmitOutcome::Ignored => Err(AppError::unexpected(
            "a submission is already in flight",
        )),
    }
}

async fn read_source(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).await.map_err(|err| {
        AppError::unexpected(format!("failed to read `{}`: {err}", path.display()))
    })
}
