#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Census area and geographic coordinate types.
//!
//! An [`Area`] is one row of the demographic table (usually a census tract
//! keyed by GEOID). Its centroid stands in for where the area's residents
//! live when measuring distance to care.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Centroid {
    /// Creates a centroid from a latitude/longitude pair.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns `true` if both coordinates are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A geographic area row as loaded from the area table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Unique area identifier (census GEOID, e.g. "06037101110").
    pub geoid: String,
    /// Representative point for the area. `None` when the source row has
    /// no usable centroid; such areas get an undefined distance rather
    /// than being dropped.
    pub centroid: Option<Centroid>,
    /// Resident population. `None` when the source value was missing or
    /// failed validation, which makes population-dependent metrics
    /// unavailable.
    pub population: Option<u64>,
    /// Remaining source columns, carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Area {
    /// Creates an area with no pass-through attributes.
    #[must_use]
    pub fn new(
        geoid: impl Into<String>,
        centroid: Option<Centroid>,
        population: Option<u64>,
    ) -> Self {
        Self {
            geoid: geoid.into(),
            centroid,
            population,
            attributes: BTreeMap::new(),
        }
    }
}

/// An inclusive latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a bounding box from its edges.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns `true` if the point lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}
