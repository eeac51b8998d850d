use tetris_defence_core::{
    CellCoord, Command, Event, GameOutcome, PieceKind, PieceMode, PrefabId, SoundCue,
    SpawnSource, TetrisPiece,
};
use tetris_defence_system_game_state::{Config, GameStatus, TurnController};
use tetris_defence_system_movement::Movement;
use tetris_defence_world::{self as world, query, World};

struct Harness {
    world: World,
    movement: Movement,
    controller: TurnController,
    log: Vec<Event>,
}

impl Harness {
    fn new(config: Config, hearts: u32) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 8,
                rows: 4,
            },
            &mut events,
        );
        world::apply(&mut world, Command::ConfigureHearts { count: hearts }, &mut events);

        let mut harness = Self {
            world,
            movement: Movement::default(),
            controller: TurnController::new(config),
            log: Vec::new(),
        };
        let mut commands = Vec::new();
        harness.controller.start(&mut commands);
        harness.pump(commands);
        harness
    }

    fn status(&self) -> GameStatus {
        GameStatus {
            wave: query::wave_snapshot(&self.world).wave,
            alive_hearts: query::life_snapshot(&self.world).alive,
            hostile_enemies: query::hostile_count(&self.world),
        }
    }

    fn pump(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.log.extend(events.iter().cloned());

            let status = self.status();
            let enemy_view = query::enemy_view(&self.world);
            self.movement.handle(&events, &enemy_view, &mut commands);
            self.controller.handle(&events, &status, &mut commands);
        }
    }

    fn spawn(&mut self, prefab: u32, cell: CellCoord) {
        self.pump(vec![Command::SpawnEnemy {
            prefab: PrefabId::new(prefab),
            cell,
            source: SpawnSource::Scripted,
        }]);
    }

    fn place_wall(&mut self, origin: CellCoord) {
        self.pump(vec![Command::PlacePiece {
            piece: TetrisPiece::new(PieceKind::O),
            origin,
            mode: PieceMode::Wall,
        }]);
    }

    fn sound_count(&self, cue: SoundCue) -> usize {
        self.log
            .iter()
            .filter(|event| **event == Event::SoundRequested { cue })
            .count()
    }
}

#[test]
fn losing_the_last_heart_is_reported_once() {
    let mut harness = Harness::new(Config::default(), 1);
    harness.spawn(1, CellCoord::new(0, 0));
    harness.spawn(1, CellCoord::new(0, 3));

    harness.place_wall(CellCoord::new(5, 1));
    harness.place_wall(CellCoord::new(3, 1));

    assert_eq!(harness.controller.outcome(), GameOutcome::Lost);
    assert_eq!(harness.sound_count(SoundCue::GameOver), 1);
    assert_eq!(harness.sound_count(SoundCue::GameWin), 0);
}

#[test]
fn losing_the_last_heart_directly_is_reported_once() {
    let mut harness = Harness::new(Config::default(), 1);
    harness.spawn(1, CellCoord::new(7, 2));

    harness.pump(vec![Command::LoseLife { amount: 1 }]);
    assert_eq!(harness.controller.outcome(), GameOutcome::Lost);
    assert!(harness.controller.check_lose_condition(&harness.status()));

    harness.place_wall(CellCoord::new(0, 0));
    harness.place_wall(CellCoord::new(3, 0));
    harness.pump(vec![Command::LoseLife { amount: 1 }]);

    assert_eq!(harness.controller.outcome(), GameOutcome::Lost);
    assert_eq!(harness.sound_count(SoundCue::GameOver), 1);
    assert_eq!(harness.sound_count(SoundCue::GameWin), 0);
}

#[test]
fn surviving_the_final_wave_with_a_clear_grid_wins_once() {
    let mut harness = Harness::new(Config::new(1, 6), 5);

    harness.place_wall(CellCoord::new(0, 0));
    harness.place_wall(CellCoord::new(4, 0));

    assert_eq!(harness.controller.outcome(), GameOutcome::Won);
    assert_eq!(harness.sound_count(SoundCue::GameWin), 1);
    assert_eq!(query::life_snapshot(&harness.world).alive, 5);
}

#[test]
fn enemy_turns_alternate_with_player_turns() {
    let mut harness = Harness::new(Config::new(10, 0), 5);
    harness.spawn(1, CellCoord::new(7, 2));

    harness.place_wall(CellCoord::new(0, 0));

    let started = harness
        .log
        .iter()
        .filter(|event| matches!(event, Event::EnemyTurnStarted { .. }))
        .count();
    let ended = harness
        .log
        .iter()
        .filter(|event| matches!(event, Event::EnemyTurnEnded { .. }))
        .count();
    assert_eq!((started, ended), (1, 1));
    assert_eq!(
        query::enemy_at(&harness.world, CellCoord::new(6, 2)).map(|enemy| enemy.glyph),
        Some("Z".to_owned())
    );
    assert_eq!(harness.controller.outcome(), GameOutcome::Continue);
}
