//! Fleet provisioning

use rand::Rng;
use tracing::info;

use super::{DeviceRecord, DeviceRegistry, RegistryResult};

/// Resolve `count` devices for `venue`, creating whatever the registry lacks.
///
/// Existing devices come first, in registry order, followed by the newly
/// created ones.
pub async fn provision_devices<R: Rng + ?Sized>(
    registry: &dyn DeviceRegistry,
    venue: &str,
    count: usize,
    rng: &mut R,
) -> RegistryResult<Vec<DeviceRecord>> {
    let mut devices = registry.list_devices(venue, count).await?;
    let shortfall = count.saturating_sub(devices.len());

    info!(venue, existing = devices.len(), creating = shortfall, "Provisioning devices");

    let fresh: Vec<DeviceRecord> =
        (0..shortfall).map(|_| DeviceRecord::generate(venue, &mut *rng)).collect();

    for record in fresh {
        devices.push(registry.create_device(record).await?);
    }

    Ok(devices)
}
