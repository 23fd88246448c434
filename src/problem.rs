//! Road network definition and input parsing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A one-way street between two intersections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Street {
    pub id: usize,
    pub name: String,
    pub start_intersection: usize,
    pub end_intersection: usize,
    /// Seconds needed to drive from one end to the other
    pub length: u32,
    /// Number of cars that use this street as a non-final leg of their route
    pub incoming_usage_count: usize,
}

impl Street {
    /// Create a new street with no recorded usage.
    pub fn new(id: usize, name: String, start: usize, end: usize, length: u32) -> Self {
        Street {
            id,
            name,
            start_intersection: start,
            end_intersection: end,
            length,
            incoming_usage_count: 0,
        }
    }
}

/// A car with a fixed route of street ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: usize,
    pub route: Vec<usize>,
}

/// A node of the network where incoming streets share a green-light cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intersection {
    pub id: usize,
    /// Streets ending here that may receive a green light
    pub incoming_streets: Vec<usize>,
    pub outgoing_streets: Vec<usize>,
}

impl Intersection {
    fn new(id: usize) -> Self {
        Intersection {
            id,
            incoming_streets: Vec::new(),
            outgoing_streets: Vec::new(),
        }
    }
}

/// A traffic signaling problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    /// Simulation length in seconds
    pub duration: u32,
    pub bonus_per_car: u32,
    pub intersections: Vec<Intersection>,
    pub streets: Vec<Street>,
    pub cars: Vec<Car>,
    street_ids: HashMap<String, usize>,
}

impl Problem {
    /// Create a problem and derive intersection adjacency and street usage counts.
    ///
    /// Street ids must equal their index in `streets`, and every intersection id
    /// referenced by a street must be below `intersection_count`.
    pub fn new(
        name: String,
        duration: u32,
        bonus_per_car: u32,
        intersection_count: usize,
        mut streets: Vec<Street>,
        cars: Vec<Car>,
    ) -> Self {
        let mut intersections: Vec<Intersection> =
            (0..intersection_count).map(Intersection::new).collect();
        let mut street_ids = HashMap::with_capacity(streets.len());

        for street in &streets {
            intersections[street.end_intersection]
                .incoming_streets
                .push(street.id);
            intersections[street.start_intersection]
                .outgoing_streets
                .push(street.id);
            street_ids.insert(street.name.clone(), street.id);
        }

        for street in streets.iter_mut() {
            street.incoming_usage_count = 0;
        }
        for car in &cars {
            if let Some((_, legs)) = car.route.split_last() {
                for &street in legs {
                    streets[street].incoming_usage_count += 1;
                }
            }
        }

        Problem {
            name,
            duration,
            bonus_per_car,
            intersections,
            streets,
            cars,
            street_ids,
        }
    }

    /// Look up a street id by name.
    pub fn street_id(&self, name: &str) -> Option<usize> {
        self.street_ids.get(name).copied()
    }

    /// Get a street by id.
    pub fn street(&self, id: usize) -> &Street {
        &self.streets[id]
    }

    /// Seconds a car needs to complete its route on an empty network.
    ///
    /// The car starts at the end of its first street, so that street is not counted.
    pub fn free_flow_time(&self, car: &Car) -> u32 {
        car.route
            .iter()
            .skip(1)
            .map(|&street| self.streets[street].length)
            .sum()
    }

    /// Best score achievable if no car ever waited at a light.
    pub fn score_upper_bound(&self) -> u64 {
        self.cars
            .iter()
            .map(|car| self.free_flow_time(car))
            .filter(|&time| time <= self.duration)
            .map(|time| u64::from(self.bonus_per_car) + u64::from(self.duration - time))
            .sum()
    }

    /// Drop streets no car waits on from their intersection's incoming list.
    ///
    /// Returns the number of streets removed. The street records stay addressable.
    pub fn remove_unused_streets(&mut self) -> usize {
        let mut removed = 0;
        let streets = &self.streets;

        for intersection in self.intersections.iter_mut() {
            let before = intersection.incoming_streets.len();
            intersection
                .incoming_streets
                .retain(|&street| streets[street].incoming_usage_count > 0);
            removed += before - intersection.incoming_streets.len();
        }

        removed
    }

    /// Load a problem from a file. The file stem becomes the problem name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "problem".to_string());

        Self::parse(name, &text)
    }

    /// Parse a problem from its text representation.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (line_no, header) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "missing header line"))?;
        let header = parse_numbers(line_no, header, 5)?;
        let (duration, intersection_count, street_count, car_count, bonus_per_car) = (
            to_u32(line_no, header[0])?,
            header[1] as usize,
            header[2] as usize,
            header[3] as usize,
            to_u32(line_no, header[4])?,
        );

        let mut streets = Vec::with_capacity(street_count);
        let mut street_ids: HashMap<String, usize> = HashMap::with_capacity(street_count);

        for id in 0..street_count {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| Error::parse(0, format!("expected {street_count} streets")))?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 4 {
                return Err(Error::parse(line_no, "expected `B E name L`"));
            }

            let start = parse_index(line_no, parts[0], intersection_count)?;
            let end = parse_index(line_no, parts[1], intersection_count)?;
            let length = parts[3]
                .parse::<u32>()
                .map_err(|e| Error::parse(line_no, format!("bad street length: {e}")))?;
            let name = parts[2].to_string();

            if street_ids.insert(name.clone(), id).is_some() {
                return Err(Error::parse(line_no, format!("duplicate street name {name}")));
            }
            streets.push(Street::new(id, name, start, end, length));
        }

        let mut cars = Vec::with_capacity(car_count);
        for id in 0..car_count {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| Error::parse(0, format!("expected {car_count} cars")))?;
            let mut parts = line.split_whitespace();
            let path_len = parts
                .next()
                .and_then(|p| p.parse::<usize>().ok())
                .ok_or_else(|| Error::parse(line_no, "missing route length"))?;

            let route = parts
                .map(|street| {
                    street_ids
                        .get(street)
                        .copied()
                        .ok_or_else(|| Error::parse(line_no, format!("unknown street {street}")))
                })
                .collect::<Result<Vec<usize>>>()?;

            if route.len() != path_len || route.is_empty() {
                return Err(Error::parse(
                    line_no,
                    format!("route declares {path_len} streets, found {}", route.len()),
                ));
            }
            cars.push(Car { id, route });
        }

        Ok(Problem::new(
            name.into(),
            duration,
            bonus_per_car,
            intersection_count,
            streets,
            cars,
        ))
    }
}

fn parse_numbers(line_no: usize, line: &str, expected: usize) -> Result<Vec<u64>> {
    let numbers = line
        .split_whitespace()
        .map(|part| {
            part.parse::<u64>()
                .map_err(|e| Error::parse(line_no, format!("bad number {part}: {e}")))
        })
        .collect::<Result<Vec<u64>>>()?;

    if numbers.len() != expected {
        return Err(Error::parse(
            line_no,
            format!("expected {expected} numbers, found {}", numbers.len()),
        ));
    }
    Ok(numbers)
}

fn to_u32(line_no: usize, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::parse(line_no, format!("{value} is out of range")))
}

fn parse_index(line_no: usize, part: &str, bound: usize) -> Result<usize> {
    let index = part
        .parse::<usize>()
        .map_err(|e| Error::parse(line_no, format!("bad intersection {part}: {e}")))?;
    if index >= bound {
        return Err(Error::parse(
            line_no,
            format!("intersection {index} out of range (0..{bound})"),
        ));
    }
    Ok(index)
}
