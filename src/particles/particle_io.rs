//! Loading and saving particle lists.
//!
//! A particle file holds one particle per line as five space separated numbers,
//! `mass posX posY velX velY`. Particles get ids in file order, starting at 0. Values are
//! written with nine significant digits.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use glam::Vec2;
use log::{debug, warn};
use crate::particles::Particle;
use crate::utils::{format_significant, SimulationError, OUTPUT_SIGNIFICANT_DIGITS};

const FIELD_NAMES: [&str; 5] = ["mass", "posX", "posY", "velX", "velY"];

/// Parses one particle record. `line_number` is 1-based and only used for error reporting.
///
/// # Examples
///
/// ```
/// use rs_nbody::particles::parse_particle;
///
/// let particle = parse_particle("2 0.5 -1 0 0.25", 1, 0).unwrap();
/// assert_eq!(particle.mass, 2.0);
/// assert_eq!(particle.position.y, -1.0);
/// assert_eq!(particle.velocity.y, 0.25);
///
/// assert!(parse_particle("2 0.5 oops 0 0", 1, 0).is_err());
/// ```
pub fn parse_particle(line: &str, line_number: usize, id: usize) -> Result<Particle, SimulationError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != FIELD_NAMES.len() {
        return Err(SimulationError::Parse {
            line: line_number,
            field: "record",
            value: line.to_string(),
        });
    }

    let mut values = [0.0_f32; 5];
    for (i, (text, name)) in fields.iter().zip(FIELD_NAMES.iter()).enumerate() {
        values[i] = text.parse::<f32>().map_err(|_| SimulationError::Parse {
            line: line_number,
            field: *name,
            value: text.to_string(),
        })?;
    }

    let [mass, px, py, vx, vy] = values;
    Ok(Particle::new(id, mass, Vec2::new(px, py), Vec2::new(vx, vy)))
}

/// Reads a particle list. Blank lines are skipped.
pub fn read_particles<R: BufRead>(reader: R) -> Result<Vec<Particle>, SimulationError> {
    let mut particles = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            warn!("Skipping blank line {} in particle list", index + 1);
            continue;
        }
        let id = particles.len();
        particles.push(parse_particle(&line, index + 1, id)?);
    }
    Ok(particles)
}

/// Loads a particle list from `path`.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Particle>, SimulationError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let particles = read_particles(BufReader::new(file))?;
    debug!("Loaded {} particles from {}", particles.len(), path.display());
    Ok(particles)
}

/// Formats one particle record, without the line terminator.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::Vec2;
/// use rs_nbody::particles::{format_particle, Particle};
///
/// let particle = Particle::new(0, 1.0, Vec2::new(0.0016, 0.0), Vec2::new(0.008, 0.0));
/// assert_eq!(format_particle(&particle), "1 0.00159999996 0 0.00800000038 0");
/// ```
pub fn format_particle(particle: &Particle) -> String {
    [
        particle.mass,
        particle.position.x,
        particle.position.y,
        particle.velocity.x,
        particle.velocity.y,
    ]
    .iter()
    .map(|&v| format_significant(f64::from(v), OUTPUT_SIGNIFICANT_DIGITS))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Writes a particle list, one record per line.
pub fn write_particles<W: Write>(mut writer: W, particles: &[Particle]) -> Result<(), SimulationError> {
    for particle in particles {
        writeln!(writer, "{}", format_particle(particle))?;
    }
    writer.flush()?;
    Ok(())
}

/// Saves a particle list to `path`, replacing any existing file.
pub fn save_to_file<P: AsRef<Path>>(path: P, particles: &[Particle]) -> Result<(), SimulationError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_particles(BufWriter::new(file), particles)?;
    debug!("Saved {} particles to {}", particles.len(), path.display());
    Ok(())
}

/// Compares two particle lists field by field.
///
/// The lists must have the same length and every mass, position and velocity component must
/// differ by less than `tolerance`. The first offending record is reported as a
/// [`SimulationError::Mismatch`] with its 1-based line number.
pub fn compare_particles(actual: &[Particle], reference: &[Particle], tolerance: f32) -> Result<(), SimulationError> {
    if actual.len() != reference.len() {
        return Err(SimulationError::Mismatch {
            line: actual.len().min(reference.len()) + 1,
            reason: format!("number of particles is {}, should be {}", actual.len(), reference.len()),
        });
    }
    for (index, (a, r)) in actual.iter().zip(reference).enumerate() {
        let pairs = [
            (a.mass, r.mass),
            (a.position.x, r.position.x),
            (a.position.y, r.position.y),
            (a.velocity.x, r.velocity.x),
            (a.velocity.y, r.velocity.y),
        ];
        if let Some((field, (x, y))) = FIELD_NAMES
            .iter()
            .zip(pairs)
            .find(|(_, (x, y))| !((x - y).abs() < tolerance))
        {
            return Err(SimulationError::Mismatch {
                line: index + 1,
                reason: format!("{} is {}, should be {}", field, x, y),
            });
        }
    }
    Ok(())
}
