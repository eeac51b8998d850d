use tetris_defence_core::{
    CellCoord, Command, EnemyKind, Event, PieceMode, PlacementError, PrefabId, PrefabRole,
    SpawnSource, HAND_SIZE, PEEK_SIZE,
};
use tetris_defence_system_placement::{Config, Placement, PlacementInput, WALL_SLOT};
use tetris_defence_world::{self as world, query, World};

fn configured_world() -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            columns: 8,
            rows: 5,
        },
        &mut events,
    );
    world
}

fn select(slot: usize) -> PlacementInput {
    PlacementInput {
        select_slot: Some(slot),
        ..PlacementInput::default()
    }
}

fn confirm_at(cell: CellCoord) -> PlacementInput {
    PlacementInput {
        confirm: true,
        cursor_cell: Some(cell),
        ..PlacementInput::default()
    }
}

/// Feeds `input` to the system and applies its commands, returning the events.
fn step(world: &mut World, placement: &mut Placement, input: PlacementInput) -> Vec<Event> {
    let mut commands = Vec::new();
    placement.handle(&[], input, &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    let mut follow_up = Vec::new();
    placement.handle(&events, PlacementInput::default(), &mut follow_up);
    assert!(follow_up.is_empty());
    events
}

#[test]
fn confirmed_wall_placement_consumes_the_held_piece() {
    let mut world = configured_world();
    let mut placement = Placement::new(Config::new(10, 1));
    let before = *placement.hand().hand();
    let next = placement.hand().peek()[0];

    let _ = step(&mut world, &mut placement, select(WALL_SLOT));
    let events = step(&mut world, &mut placement, confirm_at(CellCoord::new(2, 1)));

    assert!(events.iter().any(|event| matches!(
        event,
        Event::PiecePlaced {
            mode: PieceMode::Wall,
            ..
        }
    )));
    let walls = query::enemy_view(&world)
        .iter()
        .filter(|enemy| enemy.kind == EnemyKind::Wall && enemy.role == PrefabRole::Barrier)
        .count();
    assert_eq!(walls, before[WALL_SLOT].cell_count());

    let hand = placement.hand();
    assert_eq!(&hand.hand()[..HAND_SIZE - 1], &before[1..]);
    assert_eq!(hand.hand()[HAND_SIZE - 1], next);
    assert_eq!(hand.peek().len(), PEEK_SIZE);
    assert_eq!(hand.held(), None);
}

#[test]
fn rejected_placement_leaves_the_hand_unchanged() {
    let mut world = configured_world();
    let mut events = Vec::new();
    for row in 0..4 {
        for column in 0..4 {
            world::apply(
                &mut world,
                Command::SpawnEnemy {
                    prefab: PrefabId::new(0),
                    cell: CellCoord::new(column, row),
                    source: SpawnSource::Scripted,
                },
                &mut events,
            );
        }
    }
    let mut placement = Placement::new(Config::new(10, 1));
    let before = *placement.hand().hand();

    let _ = step(&mut world, &mut placement, select(1));
    let events = step(&mut world, &mut placement, confirm_at(CellCoord::new(0, 0)));

    assert!(events.iter().any(|event| matches!(
        event,
        Event::PlacementRejected {
            reason: PlacementError::Occupied,
            ..
        }
    )));
    assert_eq!(*placement.hand().hand(), before);
    assert_eq!(placement.hand().held(), Some(1));
}

#[test]
fn attack_placement_damages_covered_enemies() {
    let mut world = configured_world();
    let mut events = Vec::new();
    for row in 0..4 {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                prefab: PrefabId::new(1),
                cell: CellCoord::new(3, row),
                source: SpawnSource::Scripted,
            },
            &mut events,
        );
    }
    let mut placement = Placement::new(Config::new(2, 1));
    let piece = placement.hand().hand()[2];

    let _ = step(&mut world, &mut placement, select(2));
    let origin = CellCoord::new(3, 0);
    let preview = placement
        .preview(origin, query::occupancy_view(&world), |cell| {
            query::enemy_at(&world, cell).map_or(false, |enemy| !enemy.is_hostile())
        })
        .expect("held piece");
    let events = step(&mut world, &mut placement, confirm_at(origin));

    let covered_enemies = preview
        .cells
        .iter()
        .filter(|cell| cell.column() == 3)
        .count();
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert!(preview.placeable);
    assert!(covered_enemies > 0, "every shape covers its origin column");
    assert_eq!(kills, covered_enemies);
    assert_eq!(
        query::wave_snapshot(&world).enemies_killed as usize,
        covered_enemies
    );
    assert_eq!(preview.kind, piece.kind());
}
