//! Seattle Eastside addresses with their geocoded coordinates.

/// An address with the coordinates a geocoder would return for it.
#[derive(Debug, Clone)]
pub struct Location {
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(address: &'static str, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }
}

pub const HOME: Location = Location::new("24116 NE 27th PL sammamish WA", 47.6335, -122.0234);

pub const CITIES: &[Location] = &[
    Location::new("Bellevue, WA", 47.6101, -122.2015),
    Location::new("Redmond, WA", 47.6740, -122.1215),
    Location::new("Issaquah, WA", 47.5301, -122.0326),
    Location::new("Kirkland, WA", 47.6769, -122.2060),
];

pub const CUSTOMERS: &[Location] = &[
    Location::new("123 Main St, Seattle, WA", 47.6062, -122.3321),
    Location::new("456 Oak Ave, Bellevue, WA", 47.6150, -122.1920),
    Location::new("789 Pine St, Redmond, WA", 47.6720, -122.1180),
    Location::new("321 Cedar Blvd, Kirkland, WA", 47.6800, -122.2000),
    Location::new("15600 NE 8th St, Bellevue, WA", 47.6173, -122.1321),
    Location::new("2200 NW Sammamish Rd, Issaquah, WA", 47.5480, -122.0590),
    Location::new("16400 Redmond Way, Redmond, WA", 47.6770, -122.1210),
    Location::new("11525 NE 124th St, Kirkland, WA", 47.7140, -122.1860),
    Location::new("1420 156th Ave NE, Bellevue, WA", 47.6260, -122.1330),
    Location::new("22830 NE 8th St, Sammamish, WA", 47.6170, -122.0360),
    Location::new("4221 228th Ave SE, Issaquah, WA", 47.5750, -122.0340),
    Location::new("7345 164th Ave NE, Redmond, WA", 47.6700, -122.1180),
];

pub fn all() -> Vec<Location> {
    let mut locations = vec![HOME];
    locations.extend_from_slice(CITIES);
    locations.extend_from_slice(CUSTOMERS);
    locations
}

pub fn addresses(locations: &[Location]) -> Vec<String> {
    locations.iter().map(|l| l.address.to_string()).collect()
}
