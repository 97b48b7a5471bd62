//! Linux location implementation using the GeoClue2 D-Bus service.

use std::time::Duration;

use futures_timer::Delay;
use log::debug;
use zbus::Connection;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::{AccuracyTier, CachedQuery, Coordinates, CurrentQuery, LocationError, now_ms};

const SERVICE: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
const DESKTOP_ID: &str = "geotracker";

/// Interval between polls of the client's `Location` property, in milliseconds.
const POLL_INTERVAL_MS: u64 = 250;

// GClueAccuracyLevel values.
const LEVEL_NONE: u32 = 0;
const LEVEL_COUNTRY: u32 = 1;
const LEVEL_CITY: u32 = 4;
const LEVEL_NEIGHBORHOOD: u32 = 5;
const LEVEL_STREET: u32 = 6;
const LEVEL_EXACT: u32 = 8;

const fn accuracy_level(tier: AccuracyTier) -> u32 {
    match tier {
        AccuracyTier::Lowest => LEVEL_COUNTRY,
        AccuracyTier::Low => LEVEL_CITY,
        AccuracyTier::Balanced => LEVEL_NEIGHBORHOOD,
        AccuracyTier::High => LEVEL_STREET,
        AccuracyTier::Highest => LEVEL_EXACT,
    }
}

fn dbus_error(context: &'static str) -> impl FnOnce(zbus::Error) -> LocationError {
    move |e| LocationError::Unknown(format!("{context}: {e}"))
}

async fn get_property(
    connection: &Connection,
    path: &str,
    interface: &str,
    name: &str,
) -> zbus::Result<OwnedValue> {
    let reply = connection
        .call_method(
            Some(SERVICE),
            path,
            Some(PROPERTIES_IFACE),
            "Get",
            &(interface, name),
        )
        .await?;
    let value: OwnedValue = reply.body().deserialize()?;
    Ok(value)
}

async fn set_client_property(
    connection: &Connection,
    client: &OwnedObjectPath,
    name: &str,
    value: Value<'_>,
) -> Result<(), LocationError> {
    connection
        .call_method(
            Some(SERVICE),
            client.as_str(),
            Some(PROPERTIES_IFACE),
            "Set",
            &(CLIENT_IFACE, name, value),
        )
        .await
        .map_err(|e| LocationError::Unknown(format!("failed to set {name}: {e}")))?;
    Ok(())
}

async fn call_client(
    connection: &Connection,
    client: &OwnedObjectPath,
    method: &str,
) -> zbus::Result<()> {
    connection
        .call_method(Some(SERVICE), client.as_str(), Some(CLIENT_IFACE), method, &())
        .await?;
    Ok(())
}

/// GeoClue2 is considered enabled when it is reachable and reports any
/// accuracy level above "none".
pub(crate) async fn is_enabled() -> Result<bool, LocationError> {
    let connection = match Connection::system().await {
        Ok(connection) => connection,
        Err(err) => {
            debug!("system bus unavailable: {err}");
            return Ok(false);
        }
    };

    match get_property(&connection, MANAGER_PATH, MANAGER_IFACE, "AvailableAccuracyLevel").await
    {
        Ok(value) => Ok(u32::try_from(value).is_ok_and(|level| level > LEVEL_NONE)),
        Err(err) => {
            debug!("GeoClue2 not reachable: {err}");
            Ok(false)
        }
    }
}

/// GeoClue2 keeps no last-known fix that can be read without starting a client.
pub(crate) async fn last_known(_query: &CachedQuery) -> Result<Option<Coordinates>, LocationError> {
    Ok(None)
}

pub(crate) async fn current(query: &CurrentQuery) -> Result<Coordinates, LocationError> {
    let connection = Connection::system()
        .await
        .map_err(dbus_error("D-Bus connection failed"))?;

    let reply = connection
        .call_method(
            Some(SERVICE),
            MANAGER_PATH,
            Some(MANAGER_IFACE),
            "GetClient",
            &(),
        )
        .await
        .map_err(dbus_error("GeoClue2 not available"))?;
    let (client,): (OwnedObjectPath,) = reply
        .body()
        .deserialize()
        .map_err(dbus_error("failed to parse client path"))?;

    set_client_property(&connection, &client, "DesktopId", Value::from(DESKTOP_ID)).await?;
    set_client_property(
        &connection,
        &client,
        "RequestedAccuracyLevel",
        Value::from(accuracy_level(query.accuracy)),
    )
    .await?;
    // GeoClue has no maximum fix age; `max_age_ms` is covered by the
    // client only ever reporting the fix produced after `Start`.

    call_client(&connection, &client, "Start")
        .await
        .map_err(dbus_error("failed to start GeoClue client"))?;

    let fix = wait_for_fix(&connection, &client, query.timeout_ms).await;

    if let Err(err) = call_client(&connection, &client, "Stop").await {
        debug!("failed to stop GeoClue client: {err}");
    }

    fix
}

/// Poll the client until it publishes a location object.
async fn wait_for_fix(
    connection: &Connection,
    client: &OwnedObjectPath,
    timeout_ms: u64,
) -> Result<Coordinates, LocationError> {
    let polls = timeout_ms.div_ceil(POLL_INTERVAL_MS).max(1);

    for _ in 0..polls {
        let value = get_property(connection, client.as_str(), CLIENT_IFACE, "Location")
            .await
            .map_err(dbus_error("failed to get location"))?;
        let path = OwnedObjectPath::try_from(value)
            .map_err(|e| LocationError::Unknown(format!("failed to parse location path: {e}")))?;

        // "/" until the first LocationUpdated signal.
        if path.as_str() != "/" {
            return read_location(connection, &path).await;
        }
        Delay::new(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }

    Err(LocationError::Timeout)
}

async fn read_location(
    connection: &Connection,
    path: &OwnedObjectPath,
) -> Result<Coordinates, LocationError> {
    let read = |name: &'static str| async move {
        let value = get_property(connection, path.as_str(), LOCATION_IFACE, name).await?;
        f64::try_from(value).map_err(zbus::Error::from)
    };

    let latitude = read("Latitude")
        .await
        .map_err(dbus_error("failed to get latitude"))?;
    let longitude = read("Longitude")
        .await
        .map_err(dbus_error("failed to get longitude"))?;
    let accuracy = read("Accuracy").await.ok();

    Ok(Coordinates {
        latitude,
        longitude,
        accuracy_meters: accuracy,
        timestamp_ms: now_ms(),
    })
}
