//! Per-line record DTOs and their typed forms.
//!
//! The stop dumps use the operator's field names (`BusStopCode`, `Latitude`,
//! ...). Codes and coordinates arrive as numbers in some dumps and as
//! strings in others, so both are accepted.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{Direction, GeoPoint, ServiceId, StopCode};

use super::FileErrorKind;

/// A JSON value that may be a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum NumberOrString {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_stop_code(&self) -> Option<StopCode> {
        match self {
            Self::Integer(n) => u32::try_from(*n).ok().map(StopCode::new),
            Self::Float(_) => None,
            Self::Text(s) => StopCode::parse(s).ok(),
        }
    }
}

/// A stop entry exactly as it appears in a stop dump.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct StopRecordDto {
    pub bus_stop_code: NumberOrString,
    pub latitude: NumberOrString,
    pub longitude: NumberOrString,
    #[serde(default)]
    pub description: String,
}

/// Stop dump: direction number (as a string key) to ordered stops.
pub(super) type StopFileDto = BTreeMap<String, Vec<StopRecordDto>>;

/// Route dump: one array of `[lon, lat]` pairs per direction.
pub(super) type RouteFileDto = Vec<Vec<[NumberOrString; 2]>>;

/// A validated stop record.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub code: StopCode,
    pub point: GeoPoint,
    pub description: String,
}

impl TryFrom<StopRecordDto> for StopRecord {
    type Error = FileErrorKind;

    fn try_from(dto: StopRecordDto) -> Result<Self, Self::Error> {
        let code = dto.bus_stop_code.as_stop_code().ok_or_else(|| {
            FileErrorKind::InvalidRecord(format!("bad stop code {:?}", dto.bus_stop_code))
        })?;
        let (Some(lat), Some(lon)) = (dto.latitude.as_f64(), dto.longitude.as_f64()) else {
            return Err(FileErrorKind::InvalidRecord(format!(
                "stop {code}: non-numeric coordinate"
            )));
        };
        let point = GeoPoint::new(lat, lon)
            .map_err(|e| FileErrorKind::InvalidRecord(format!("stop {code}: {e}")))?;

        Ok(Self {
            code,
            point,
            description: dto.description,
        })
    }
}

/// All stop records of one line file, per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStops {
    pub service: ServiceId,
    pub directions: Vec<(Direction, Vec<StopRecord>)>,
}

impl LineStops {
    pub(super) fn from_dto(service: ServiceId, dto: StopFileDto) -> Result<Self, FileErrorKind> {
        let mut directions = Vec::with_capacity(dto.len());
        for (key, records) in dto {
            let direction = key
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Direction::from_number)
                .ok_or_else(|| FileErrorKind::InvalidRecord(format!("direction key {key:?}")))?;
            let records = records
                .into_iter()
                .map(StopRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            directions.push((direction, records));
        }
        Ok(Self {
            service,
            directions,
        })
    }
}

/// All route geometry of one line file, per direction.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRoutes {
    pub service: ServiceId,
    pub directions: Vec<(Direction, Vec<GeoPoint>)>,
}

impl LineRoutes {
    pub(super) fn from_dto(service: ServiceId, dto: RouteFileDto) -> Result<Self, FileErrorKind> {
        let mut directions = Vec::with_capacity(dto.len());
        for (i, pairs) in dto.into_iter().enumerate() {
            let direction = u8::try_from(i + 1)
                .ok()
                .and_then(Direction::from_number)
                .ok_or_else(|| {
                    FileErrorKind::InvalidRecord(format!("unexpected direction #{}", i + 1))
                })?;
            let points = pairs
                .iter()
                .map(|[lon, lat]| {
                    let (Some(lon), Some(lat)) = (lon.as_f64(), lat.as_f64()) else {
                        return Err(FileErrorKind::InvalidRecord(
                            "non-numeric route coordinate".into(),
                        ));
                    };
                    GeoPoint::from_lon_lat(lon, lat)
                        .map_err(|e| FileErrorKind::InvalidRecord(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            directions.push((direction, points));
        }
        Ok(Self {
            service,
            directions,
        })
    }
}

/// Parsed, not yet area-filtered, network records.
///
/// Shared read-only between requests; each request builds its own network
/// from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNetwork {
    pub stops: Vec<LineStops>,
    pub routes: Vec<LineRoutes>,
}
