use anyhow::Result;
use irradiance_core::{ingestion::ingest, PipelineError, SensorCatalog, SensorId};
use irradiance_parser::ParserError;
use polars::df;

const GHI_TAG: &str = "Datalogger[7].Meteo[1].MRI_IrradianceGlobal";
const PIR1_TAG: &str = "Datalogger[1].SensorAI[2].MRI_Value01";

#[test]
fn channels_are_keyed_by_canonical_sensor() -> Result<()> {
    let table = df!(
        "TagName" => [PIR1_TAG, PIR1_TAG],
        "Value" => [398.0f64, 399.0],
        "Timestamp" => ["04/04/2024 10:00:00", "04/04/2024 10:01:00"],
        "TagName.1" => [GHI_TAG, GHI_TAG],
        "Value.1" => [410.0f64, 411.0],
        "Timestamp.1" => ["04/04/2024 10:00:00", "04/04/2024 10:01:00"],
    )?;

    let channels = ingest(&table, &SensorCatalog::standard_station())?;

    let sensors: Vec<SensorId> = channels.keys().copied().collect();
    assert_eq!(sensors, vec![SensorId::Ghi, SensorId::Pir1]);
    assert_eq!(channels[&SensorId::Pir1].tag, PIR1_TAG);
    assert_eq!(channels[&SensorId::Ghi].channel_index, 1);
    Ok(())
}

#[test]
fn unknown_tags_are_rejected() -> Result<()> {
    let table = df!(
        "TagName" => ["Datalogger[9].Meteo[1].MRI_WindSpeed"],
        "Value" => [3.5f64],
        "Timestamp" => ["04/04/2024 10:00:00"],
    )?;

    match ingest(&table, &SensorCatalog::standard_station()) {
        Err(PipelineError::UnknownSensor { tag }) => {
            assert_eq!(tag, "Datalogger[9].Meteo[1].MRI_WindSpeed")
        }
        other => panic!("expected unknown sensor error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn two_triples_for_one_sensor_are_rejected() -> Result<()> {
    let table = df!(
        "TagName" => [GHI_TAG],
        "Value" => [410.0f64],
        "Timestamp" => ["04/04/2024 10:00:00"],
        "TagName.1" => [format!(" {GHI_TAG} ")],
        "Value.1" => [411.0f64],
        "Timestamp.1" => ["04/04/2024 10:00:00"],
    )?;

    match ingest(&table, &SensorCatalog::standard_station()) {
        Err(PipelineError::DuplicateSensor { sensor, .. }) => assert_eq!(sensor, SensorId::Ghi),
        other => panic!("expected duplicate sensor error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_shape_surfaces_as_format_error() -> Result<()> {
    let table = df!(
        "TagName" => [GHI_TAG],
        "Value" => [410.0f64],
    )?;

    assert!(matches!(
        ingest(&table, &SensorCatalog::standard_station()),
        Err(PipelineError::Format(ParserError::ColumnCount { found: 2 }))
    ));
    Ok(())
}
