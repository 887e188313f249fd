use slapseg::config::HarnessConfig;
use slapseg::engine;
use slapseg::error::SlapResult;
use slapseg::types::SlapKind;
use strum::IntoEnumIterator;
use tracing::warn;

pub fn identify(harness: &HarnessConfig) -> SlapResult<()> {
    let engine = engine::load(&harness.engine, &harness.engine_config)?;
    let id = engine.identification();

    for problem in id.problems() {
        warn!("⚠️  Identification: {}", problem);
    }

    println!("LibraryIdentifier = {}", id.library_identifier);
    println!("MarketingIdentifier = {}", id.marketing_identifier);
    println!("Version = 0x{:04x}", id.version);
    Ok(())
}

pub fn supported(harness: &HarnessConfig) -> SlapResult<()> {
    let engine = engine::load(&harness.engine, &harness.engine_config)?;
    let supported = engine.supported();

    if supported.kinds.is_empty() {
        warn!("⚠️  Engine claims no supported image kinds");
    }

    for kind in SlapKind::iter() {
        println!("{:?} = {}", kind, supported.supports(kind));
    }
    println!("DetermineOrientation = {}", supported.determine_orientation);
    Ok(())
}
