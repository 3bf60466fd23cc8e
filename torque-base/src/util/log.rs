/// Provides the recommended log filter for programs which want to exclude particularly noisy
/// details of the simulation.
///
/// The guiding principle for this filtering is that at [`log::Level::Debug`] or lower level,
/// there should be no messages produced every tick unless something is wrong. Per-contact
/// solver tracing in `torque::physics` is therefore only kept when it is above
/// [`log::Level::Trace`].
#[allow(clippy::missing_inline_in_public_items)]
pub fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    let target = metadata.target();

    !(target.starts_with("torque::physics") && metadata.level() >= log::Level::Trace)
}
