// --- File: crates/buslink_trips/src/seed.rs ---
//! The master catalog: a fixed list of intercity connections that the seed
//! script expands into `routes` and `schedules` documents after wiping the
//! existing data.

use buslink_common::models::{Route, Schedule};

/// Daily departure times shared by every route.
pub const TIMETABLE: [&str; 10] = [
    "05:00", "06:00", "07:00", "08:00", "10:00", "12:00", "14:00", "16:00", "21:00", "22:30",
];

pub const DEFAULT_TOTAL_SEATS: i64 = 40;
pub const DEFAULT_OPERATOR: &str = "Buslink Official";
pub const DEFAULT_BUS_TYPE: &str = "Standard";

pub struct RouteVariant {
    pub via: &'static str,
    pub duration: &'static str,
    pub price: f64,
    pub code: &'static str,
}

pub struct MasterRoute {
    pub origin: &'static str,
    pub dest: &'static str,
    pub variants: [RouteVariant; 2],
}

macro_rules! master_route {
    ($origin:literal => $dest:literal;
     $via1:literal, $dur1:literal, $price1:literal, $code1:literal;
     $via2:literal, $dur2:literal, $price2:literal, $code2:literal) => {
        MasterRoute {
            origin: $origin,
            dest: $dest,
            variants: [
                RouteVariant {
                    via: $via1,
                    duration: $dur1,
                    price: $price1,
                    code: $code1,
                },
                RouteVariant {
                    via: $via2,
                    duration: $dur2,
                    price: $price2,
                    code: $code2,
                },
            ],
        }
    };
}

/// Every origin/destination pair in both directions, two via-variants each.
pub const MASTER_ROUTES: [MasterRoute; 20] = [
    master_route!("Colombo" => "Kandy"; "Gampaha", "3h 15m", 750.0, "GAM"; "Kurunegala", "3h 45m", 780.0, "KUR"),
    master_route!("Kandy" => "Colombo"; "Gampaha", "3h 15m", 750.0, "GAM"; "Kurunegala", "3h 45m", 780.0, "KUR"),
    master_route!("Colombo" => "Galle"; "Kalutara", "2h 20m", 650.0, "KAL"; "Bentota", "2h 30m", 670.0, "BEN"),
    master_route!("Galle" => "Colombo"; "Kalutara", "2h 20m", 650.0, "KAL"; "Bentota", "2h 30m", 670.0, "BEN"),
    master_route!("Colombo" => "Jaffna"; "Vavuniya", "7h 45m", 1650.0, "VAV"; "Anuradhapura", "8h 15m", 1700.0, "ANU"),
    master_route!("Jaffna" => "Colombo"; "Vavuniya", "7h 45m", 1650.0, "VAV"; "Anuradhapura", "8h 15m", 1700.0, "ANU"),
    master_route!("Colombo" => "Trincomalee"; "Dambulla", "6h 00m", 1350.0, "DAM"; "Habarana", "6h 15m", 1380.0, "HAB"),
    master_route!("Trincomalee" => "Colombo"; "Dambulla", "6h 00m", 1350.0, "DAM"; "Habarana", "6h 15m", 1380.0, "HAB"),
    master_route!("Kandy" => "Galle"; "Matara", "6h 30m", 1150.0, "MAT"; "Colombo", "7h 00m", 1100.0, "CMB"),
    master_route!("Galle" => "Kandy"; "Matara", "6h 30m", 1150.0, "MAT"; "Colombo", "7h 00m", 1100.0, "CMB"),
    master_route!("Kandy" => "Jaffna"; "Dambulla", "6h 30m", 1450.0, "DAM"; "Anuradhapura", "7h 00m", 1480.0, "ANU"),
    master_route!("Jaffna" => "Kandy"; "Dambulla", "6h 30m", 1450.0, "DAM"; "Anuradhapura", "7h 00m", 1480.0, "ANU"),
    master_route!("Kandy" => "Trincomalee"; "Dambulla", "4h 30m", 850.0, "DAM"; "Habarana", "4h 45m", 880.0, "HAB"),
    master_route!("Trincomalee" => "Kandy"; "Dambulla", "4h 30m", 850.0, "DAM"; "Habarana", "4h 45m", 880.0, "HAB"),
    master_route!("Galle" => "Jaffna"; "Colombo", "10h 00m", 1900.0, "CMB"; "Anuradhapura", "10h 30m", 1950.0, "ANU"),
    master_route!("Jaffna" => "Galle"; "Colombo", "10h 00m", 1900.0, "CMB"; "Anuradhapura", "10h 30m", 1950.0, "ANU"),
    master_route!("Galle" => "Trincomalee"; "Colombo", "8h 30m", 1600.0, "CMB"; "Kandy", "9h 00m", 1650.0, "KDY"),
    master_route!("Trincomalee" => "Galle"; "Colombo", "8h 30m", 1600.0, "CMB"; "Kandy", "9h 00m", 1650.0, "KDY"),
    master_route!("Jaffna" => "Trincomalee"; "Vavuniya", "5h 00m", 950.0, "VAV"; "Anuradhapura", "5h 30m", 980.0, "ANU"),
    master_route!("Trincomalee" => "Jaffna"; "Vavuniya", "5h 00m", 950.0, "VAV"; "Anuradhapura", "5h 30m", 980.0, "ANU"),
];

/// Parses a `"3h 15m"` style duration into minutes; 120 on anything else.
pub fn parse_duration_mins(raw: &str) -> i64 {
    let parsed = (|| {
        let (hours, rest) = raw.split_once('h')?;
        let minutes = rest.trim().strip_suffix('m')?;
        let hours: i64 = hours.trim().parse().ok()?;
        let minutes: i64 = minutes.trim().parse().ok()?;
        Some(hours * 60 + minutes)
    })();
    parsed.unwrap_or(120)
}

/// Short code used in route and service identifiers.
pub fn city_code(city: &str) -> String {
    match city {
        "Colombo" => "CMB".to_string(),
        "Kandy" => "KDY".to_string(),
        "Galle" => "GAL".to_string(),
        "Jaffna" => "JFN".to_string(),
        "Trincomalee" => "TRI".to_string(),
        other => other.chars().take(3).collect::<String>().to_uppercase(),
    }
}

/// Expands the master list into the route and schedule documents to seed.
///
/// One route per variant (distinct vias have distinct durations), and one
/// schedule per route per timetable slot, running daily. Distance is
/// approximated from the duration pending real survey data.
pub fn master_catalog() -> (Vec<Route>, Vec<Schedule>) {
    let mut routes = Vec::new();
    let mut schedules = Vec::new();

    for master in &MASTER_ROUTES {
        for variant in &master.variants {
            let route_id = format!(
                "route_{}_{}_{}",
                city_code(master.origin),
                city_code(master.dest),
                variant.code
            );
            let duration_mins = parse_duration_mins(variant.duration);

            routes.push(Route {
                id: route_id.clone(),
                origin_city: master.origin.to_string(),
                destination_city: master.dest.to_string(),
                via: Some(variant.via.to_string()),
                stops: vec![
                    master.origin.to_string(),
                    variant.via.to_string(),
                    master.dest.to_string(),
                ],
                distance_km: (duration_mins as f64 * 0.7).floor(),
                estimated_duration_mins: duration_mins,
                is_active: true,
            });

            for (index, time) in TIMETABLE.iter().enumerate() {
                let schedule_id = format!("sch_{}_{}", route_id, time.replace(':', ""));
                let service_id = format!(
                    "{}-{}-{}-{:02}",
                    city_code(master.origin),
                    city_code(master.dest),
                    variant.code,
                    index + 1
                );
                schedules.push(Schedule {
                    id: schedule_id,
                    route_id: route_id.clone(),
                    departure_time: (*time).to_string(),
                    recurrence_days: vec![1, 2, 3, 4, 5, 6, 7],
                    base_price: variant.price,
                    total_seats: DEFAULT_TOTAL_SEATS,
                    amenities: vec!["AC".to_string(), "Adjustable Seats".to_string()],
                    bus_number: service_id,
                    operator_name: DEFAULT_OPERATOR.to_string(),
                    bus_type: DEFAULT_BUS_TYPE.to_string(),
                    conductor_id: None,
                });
            }
        }
    }

    (routes, schedules)
}
