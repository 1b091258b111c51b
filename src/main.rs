use env_logger::Env;
use journal_issues::{
    config::{get_journal_config, AppConfig},
    db::{
        journal_repository::JournalRepository, schema::init_db,
        settings_repository::JournalSettingsRepository,
    },
    errors::JournalError,
    journal_settings::JournalSettingsResolver,
    models::journal::{Journal, NewJournal},
    models::locale::{LocaleContext, LocalizedText},
    models::settings::JournalSetting,
    services::locale_registry::StaticLocaleRegistry,
    utils::ensure_dir,
};
use log::{error, info, warn};

fn seed_default_journal(config: &AppConfig) -> Result<Journal, JournalError> {
    let defaults = get_journal_config();
    let journals = JournalRepository::new(init_db(&config.db_path)?);

    // Check if the journal already exists
    if let Some(journal) = journals.get_journal_by_path(&defaults.path)? {
        info!("Journal {:?} already exists with ID {}", journal.path, journal.id);
        return Ok(journal);
    }

    info!("Journal {:?} not found, creating...", defaults.path);
    let journal = journals.insert_journal(&NewJournal {
        path: defaults.path.clone(),
        sequence: 1.0,
        enabled: true,
        primary_locale: defaults.primary_locale.clone(),
    })?;

    let settings = JournalSettingsRepository::new(init_db(&config.db_path)?);
    let registry = StaticLocaleRegistry::new();
    let resolver = JournalSettingsResolver::new(&settings, &registry);

    let primary = defaults.primary_locale.as_str();
    resolver.set_localized_text(
        journal.id,
        JournalSetting::Title,
        &LocalizedText::new().with(primary, defaults.name.as_str()),
    )?;
    resolver.set_localized_text(
        journal.id,
        JournalSetting::Description,
        &LocalizedText::new().with(primary, defaults.description.as_str()),
    )?;
    let locales: Vec<&str> = defaults.supported_locales.iter().map(String::as_str).collect();
    for setting in [
        JournalSetting::SupportedLocales,
        JournalSetting::SupportedFormLocales,
        JournalSetting::SupportedSubmissionLocales,
    ] {
        resolver.set_supported_locales(journal.id, setting, &locales)?;
    }
    resolver.set_publishing_mode(journal.id, defaults.publishing_mode)?;

    info!("Journal created successfully with ID {}", journal.id);
    Ok(journal)
}

fn describe_journal(config: &AppConfig, journal: &Journal) -> Result<(), JournalError> {
    let settings = JournalSettingsRepository::new(init_db(&config.db_path)?);
    let registry = StaticLocaleRegistry::new();
    let resolver = JournalSettingsResolver::new(&settings, &registry);
    let ctx = LocaleContext::new(config.active_locale.as_str(), journal.primary_locale.as_str());

    let title = resolver.localized_title(journal.id, None, &ctx)?;
    info!(
        "Journal at {}: {}",
        journal.url(&config.base_url),
        title.as_deref().unwrap_or("(untitled)")
    );

    match resolver.localized_page_header_title(journal.id, true, &ctx)? {
        Some(header) => info!("Home page header: {:?}", header),
        None => info!("Home page header not configured"),
    }

    let locales = resolver
        .supported_locale_names(journal.id, JournalSetting::SupportedLocales)?
        .into_iter()
        .map(|l| format!("{} ({})", l.display_name, l.code))
        .collect::<Vec<String>>();
    info!("Supported locales: {}", locales.join(", "));
    info!(
        "Publishing mode: {}",
        resolver.publishing_mode(journal.id)?
    );

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    for dir in [&config.public_dir, &config.temp_dir] {
        if let Err(e) = ensure_dir(dir) {
            warn!("Failed to create directory {:?}: {}", dir, e);
        }
    }

    // --- Seed Default Journal ---
    let journal = match seed_default_journal(&config) {
        Ok(journal) => journal,
        Err(e) => {
            error!("Failed to seed default journal: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = describe_journal(&config, &journal) {
        error!("Failed to resolve journal settings: {}", e);
        std::process::exit(1);
    }
}
