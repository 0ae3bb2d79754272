use clap::{Parser, Subcommand};
use tracing::warn;
use winsnap::common::config::{Config, config_file};
use winsnap::common::log;
use winsnap::layout_engine::Layout;

/// Snap an application's windows into screen regions, or move them to
/// another display. The target is the frontmost application unless --app is
/// given.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Target the first running app whose bundle id contains this string
    /// instead of the frontmost application.
    #[arg(long, global = true)]
    app: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a layout to the target app's windows.
    Layout { layout: Layout },
    /// Move the target app's windows to the display at the given index.
    MoveToDisplay { index: usize },
    /// List attached displays with their position labels.
    Displays,
    /// List available layouts.
    Layouts,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log::init_logging();

    let config = if config_file().exists() {
        Config::read(&config_file())?
    } else {
        Config::default()
    };
    for issue in config.validate() {
        warn!("config: {issue}");
    }

    if let Command::Layouts = cli.command {
        use clap::ValueEnum;
        use strum::IntoEnumIterator;
        for layout in Layout::iter() {
            let name = layout.to_possible_value().unwrap();
            println!("{:<14} {}", name.get_name(), layout.title());
        }
        return Ok(());
    }

    run(cli, config)
}

#[cfg(target_os = "macos")]
fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::{anyhow, bail};
    use objc2::MainThreadMarker;
    use winsnap::actor::layout_controller::{LayoutController, Request};
    use winsnap::sys::app;
    use winsnap::sys::screen::{DisplayTopology, NSScreenSource, ScreenSource};
    use winsnap::sys::window::{AxWindowControl, Error};

    let mtm =
        MainThreadMarker::new().ok_or_else(|| anyhow!("winsnap must run on the main thread"))?;
    let screens = NSScreenSource::new(mtm);

    let request = match cli.command {
        Command::Displays => {
            let topology = DisplayTopology::new(screens.screens());
            let labels = topology.position_labels();
            for (index, (screen, label)) in topology.screens().iter().zip(labels).enumerate() {
                println!("{index}: {} [{}]", screen.name, label.title());
            }
            return Ok(());
        }
        Command::Layout { layout } => Request::ApplyLayout(layout),
        Command::MoveToDisplay { index } => {
            // Reject a bad index here; the controller never sees it.
            let count = screens.screens().len();
            if index >= count {
                bail!("display index {index} out of range ({count} display(s) attached)");
            }
            Request::MoveToDisplay(index)
        }
        Command::Layouts => unreachable!(),
    };

    if !AxWindowControl::is_trusted() {
        return Err(anyhow::Error::new(Error::NotTrusted).context(
            "enable winsnap in System Settings > Privacy & Security > Accessibility",
        ));
    }

    let target = match &cli.app {
        Some(filter) => app::running_app_matching(filter)
            .ok_or_else(|| anyhow!("no running app with a bundle id matching '{filter}'"))?,
        None => app::frontmost_app().ok_or_else(|| anyhow!("no frontmost application"))?,
    };

    let activate = config.settings.activate_after_apply;
    let mut controller = LayoutController::new(Arc::new(config), AxWindowControl::new(), screens);
    controller.target_mut().update(target.clone());
    let report = controller.handle(request);
    println!("{} window(s) affected for {}", report.affected(), target.display_name());

    if activate {
        app::activate(&target);
    }
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(cli: Cli, _config: Config) -> anyhow::Result<()> {
    use anyhow::bail;

    let Cli { app: _app, command } = cli;
    match command {
        Command::Layout { layout } => bail!(
            "cannot apply {}: winsnap drives the macOS Accessibility API, which requires macOS",
            layout.title()
        ),
        Command::MoveToDisplay { index } => {
            bail!("cannot move windows to display {index}: window control requires macOS")
        }
        Command::Displays => bail!("display enumeration requires macOS"),
        Command::Layouts => unreachable!(),
    }
}
