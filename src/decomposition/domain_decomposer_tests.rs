use std::collections::HashSet;
use glam::Vec2;
use crate::decomposition::{estimate_costs, Axis, BalanceMode, Decomposer, Partition};
use crate::particles::{generate_scene, Particle, SceneKind};
use crate::utils::SimulationError;

fn assert_is_partition(partition: &Partition, particles: &[Particle]) {
    let mut seen = HashSet::new();
    for share in &partition.shares {
        for p in &share.owned {
            assert!(seen.insert(p.id), "particle {} owned twice", p.id);
            assert!(share.region.contains(p.position), "particle {} outside its owner's region", p.id);
        }
    }
    let all: HashSet<usize> = particles.iter().map(|p| p.id).collect();
    assert_eq!(seen, all);
}

fn assert_halo_complete(partition: &Partition, particles: &[Particle], cull_radius: f32) {
    for share in &partition.shares {
        let visible: HashSet<usize> = share.owned.iter().chain(&share.halo).map(|p| p.id).collect();
        for target in &share.owned {
            for source in particles {
                if target.distance_to(source) <= cull_radius {
                    assert!(
                        visible.contains(&source.id),
                        "worker {} misses neighbour {} of particle {}",
                        share.rank,
                        source.id,
                        target.id
                    );
                }
            }
        }
        for p in &share.halo {
            assert!(!share.owned.iter().any(|o| o.id == p.id), "halo copy of an owned particle");
        }
    }
}

#[test]
fn test_rejects_zero_workers() {
    assert!(matches!(
        Decomposer::new(0, 1.0, BalanceMode::Static),
        Err(SimulationError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_single_worker_owns_everything() {
    let particles = generate_scene(SceneKind::Random, 100, 10.0, 1);
    let partition = Decomposer::new(1, 2.5, BalanceMode::Static).unwrap().decompose(&particles);
    assert_eq!(partition.shares.len(), 1);
    assert_eq!(partition.shares[0].owned, particles);
    assert!(partition.shares[0].halo.is_empty());
    assert!(partition.cuts.is_empty());
}

#[test]
fn test_static_and_dynamic_partitions_are_exact() {
    for kind in [SceneKind::Random, SceneKind::Corner, SceneKind::Repeat, SceneKind::Sparse] {
        let particles = generate_scene(kind, 600, 40.0, 21);
        for workers in 1..=7 {
            for mode in [BalanceMode::Static, BalanceMode::Dynamic] {
                let decomposer = Decomposer::new(workers, 10.0, mode).unwrap();
                let partition = decomposer.decompose(&particles);
                assert_eq!(partition.shares.len(), workers);
                assert_eq!(partition.cuts.len(), workers - 1);
                assert_is_partition(&partition, &particles);
            }
        }
    }
}

#[test]
fn test_halo_covers_all_neighbours() {
    let particles = generate_scene(SceneKind::Random, 500, 40.0, 2);
    for mode in [BalanceMode::Static, BalanceMode::Dynamic] {
        let decomposer = Decomposer::new(5, 4.0, mode).unwrap();
        let partition = decomposer.decompose(&particles);
        assert_halo_complete(&partition, &particles, 4.0);
    }
}

#[test]
fn test_strips_follow_longer_axis() {
    let particles: Vec<Particle> = (0..10)
        .map(|i| Particle::new(i, 1.0, Vec2::new(0.5 * (i % 2) as f32, i as f32), Vec2::ZERO))
        .collect();
    let partition = Decomposer::new(2, 1.0, BalanceMode::Static).unwrap().decompose(&particles);
    assert_eq!(partition.axis, Axis::Y);
    assert_eq!(partition.cuts, vec![4.5]);
}

#[test]
fn test_particles_beyond_previous_bounds_still_owned() {
    let mut particles = generate_scene(SceneKind::Random, 50, 10.0, 4);
    particles.push(Particle::new(50, 1.0, Vec2::new(-1000.0, 5.0), Vec2::ZERO));
    particles.push(Particle::new(51, 1.0, Vec2::new(1000.0, 5.0), Vec2::ZERO));
    let partition = Decomposer::new(3, 1.0, BalanceMode::Dynamic).unwrap().decompose(&particles);
    assert_is_partition(&partition, &particles);
    assert_eq!(partition.owner_of(Vec2::new(-1000.0, 5.0)), 0);
    assert_eq!(partition.owner_of(Vec2::new(1000.0, 5.0)), 2);
}

#[test]
fn test_dynamic_balances_skewed_input() {
    let particles = generate_scene(SceneKind::Corner, 2_000, 100.0, 6);
    let mut decomposer = Decomposer::new(4, 0.0, BalanceMode::Dynamic).unwrap();
    // Equal measured cost: the split degenerates to count balancing.
    decomposer.record_costs(particles.iter().map(|p| (p.id, 0)));
    let dynamic = decomposer.decompose(&particles);
    let stat = Decomposer::new(4, 0.0, BalanceMode::Static).unwrap().decompose(&particles);
    assert!(dynamic.imbalance() < 1.1, "dynamic imbalance {}", dynamic.imbalance());
    assert!(stat.imbalance() > dynamic.imbalance());
}

#[test]
fn test_recorded_costs_move_boundaries() {
    let particles: Vec<Particle> = (0..100)
        .map(|i| Particle::new(i, 1.0, Vec2::new(i as f32, 0.0), Vec2::ZERO))
        .collect();
    let mut decomposer = Decomposer::new(2, 0.5, BalanceMode::Dynamic).unwrap();
    decomposer.record_costs(particles.iter().map(|p| (p.id, 0)));
    assert_eq!(decomposer.decompose(&particles).cuts, vec![50.0]);

    // The first 20 particles become ten times as expensive as the rest.
    decomposer.record_costs((0..20).map(|id| (id, 9)));
    let partition = decomposer.decompose(&particles);
    assert!(partition.cuts[0] < 50.0, "cut did not move: {:?}", partition.cuts);
    assert_eq!(decomposer.cost_of(3), Some(9));
    assert_eq!(decomposer.cost_of(500), None);
}

#[test]
fn test_more_workers_than_particles() {
    let particles: Vec<Particle> = (0..3)
        .map(|i| Particle::new(i, 1.0, Vec2::new(i as f32, 0.0), Vec2::ZERO))
        .collect();
    for mode in [BalanceMode::Static, BalanceMode::Dynamic] {
        let partition = Decomposer::new(8, 1.0, mode).unwrap().decompose(&particles);
        assert_is_partition(&partition, &particles);
    }
}

#[test]
fn test_empty_input() {
    let partition = Decomposer::new(3, 1.0, BalanceMode::Dynamic).unwrap().decompose(&[]);
    assert_eq!(partition.shares.len(), 3);
    assert!(partition.shares.iter().all(|s| s.owned.is_empty() && s.halo.is_empty()));
}

#[test]
fn test_estimate_costs_follow_density() {
    let mut particles = generate_scene(SceneKind::Random, 500, 100.0, 8);
    let dense: Vec<Particle> = generate_scene(SceneKind::Random, 500, 1.0, 9)
        .into_iter()
        .map(|p| Particle { id: p.id + 500, ..p })
        .collect();
    particles.extend(dense);
    let costs = estimate_costs(&particles, 2.0);
    assert_eq!(costs.len(), particles.len());
    let sparse_mean: f32 = costs[..500].iter().map(|&c| c as f32).sum::<f32>() / 500.0;
    let dense_mean: f32 = costs[500..].iter().map(|&c| c as f32).sum::<f32>() / 500.0;
    assert!(dense_mean > sparse_mean);
}
