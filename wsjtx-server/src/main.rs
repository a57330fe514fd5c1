//! WSJT-X UDP companion server
//!
//! Replays the station log into the worked-before engine, binds the UDP
//! socket and colors decoded callsigns in the running WSJT-X instance until
//! the peer closes or the process is interrupted.

mod qsodb;
mod settings;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qsodb::QsoDbClient;
use settings::Settings;
use wsjtx_link::{BandPlan, Session, SessionConfig, UdpLink};
use wsjtx_wbf::{adif, ConfirmedSource, PrefixTable, WorkedBefore};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wsjtx_server=info,wsjtx_protocol=info,wsjtx_wbf=info,wsjtx_link=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting wsjtx-server");
    let settings = Settings::load();

    let engine = build_engine(&settings)?;
    let session = Session::new(
        SessionConfig {
            callsign: settings.callsign.clone(),
            locator: settings.locator.clone(),
            send_locator_message: settings.set_locator_message,
            ..SessionConfig::default()
        },
        engine,
        BandPlan::region1(),
    );

    let mut link = UdpLink::bind(&settings.listen, session)
        .with_context(|| format!("binding {}", settings.listen))?;

    // Teardown must also run when the process is interrupted; the handler
    // wakes the blocking receive so the loop can exit cleanly.
    let shutdown = link.shutdown_handle()?;
    ctrlc::set_handler(move || shutdown.request()).context("installing the signal handler")?;

    link.run()?;
    info!("done");
    Ok(())
}

fn build_engine(settings: &Settings) -> Result<WorkedBefore> {
    let matcher = Box::new(PrefixTable::builtin());
    let confirmed = match (&settings.db_url, &settings.db_user) {
        (Some(url), Some(user)) => Some(QsoDbClient::new(
            url,
            user,
            settings.db_password.as_deref(),
        )?),
        _ => None,
    };

    let mut engine = if confirmed.is_some() {
        WorkedBefore::confirmed_only(matcher)
    } else {
        WorkedBefore::new(matcher)
    };
    engine.set_highlight(settings.highlight.clone());

    if settings.adif_path.exists() {
        let text = read_log(&settings.adif_path, &settings.encoding)
            .with_context(|| format!("reading {}", settings.adif_path.display()))?;
        let records = adif::parse(&text)
            .with_context(|| format!("parsing {}", settings.adif_path.display()))?;
        info!(
            records = records.len(),
            log = %settings.adif_path.display(),
            "replaying station log"
        );
        engine.replay(records);
    } else {
        warn!(log = %settings.adif_path.display(), "station log not found, starting empty");
    }

    if let Some(client) = &confirmed {
        let entities = client
            .confirmed_entities(&settings.locator)
            .context("fetching confirmed contacts")?;
        info!(confirmed = entities.len(), "seeding confirmed entities");
        engine.seed_confirmed(&entities);
    }

    Ok(engine)
}

/// The log file encoding is configurable because old logs predate UTF-8
/// everywhere; anything that is not latin-1 is treated as UTF-8.
fn read_log(path: &Path, encoding: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let text = match encoding.to_ascii_lowercase().as_str() {
        "latin-1" | "latin1" | "iso-8859-1" => bytes.iter().map(|&b| b as char).collect(),
        _ => String::from_utf8_lossy(&bytes).into_owned(),
    };
    Ok(text)
}
