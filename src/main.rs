use anyhow::Result;
use clap::Parser;
use snellwave::output;
use snellwave::session::Session;
use snellwave::settings::{self, CliArgs};
use snellwave::sweep;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let list = args.list;
    let settings = settings::load_config_with(args)?;

    if list {
        println!("{}", output::format_catalog(&settings.load_catalog()?));
        return Ok(());
    }

    println!("{}", settings);

    let session = Session::from_settings(&settings)?;
    let (name1, name2) = session.media_names();
    let (m1, m2) = session.media();
    println!("{}", output::format_media(name1, &m1, name2, &m2));

    let solution = session.solution();
    println!("{}", solution);

    if settings.json {
        output::write_json(solution, &settings.directory)?;
    }

    if let Some(range) = settings.sweep {
        let solutions = sweep::sweep(session.mode(), &m1, &m2, &range);
        let path = output::write_sweep(&solutions, &settings.directory)?;
        println!("Sweep of {} angles written to {:?}", solutions.len(), path);
    }

    Ok(())
}
