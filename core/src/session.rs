use alloc::format;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Health lost per dug mine.
pub const MINE_DAMAGE: i32 = 20;

/// One discrete key press, already decoded by the input collaborator.
/// Keys that map to none of these are the collaborator's no-op, not
/// ours.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    ToggleFlag,
    Descend,
}

/// What one call to [`GameSession::handle_input`] changed. The full
/// state is read back through the snapshot accessors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub moved: bool,
    pub dig: Option<DigOutcome>,
    pub flag_toggled: bool,
    pub level_changed: bool,
}

impl TurnOutcome {
    pub fn has_update(self) -> bool {
        self.moved
            || self.flag_toggled
            || self.level_changed
            || self.dig.map_or(false, DigOutcome::has_update)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active,
    /// Health ran out. Terminal: every further input is a no-op.
    Over,
}

/// A whole play session: one character, the current level's board, the
/// event feed, and the RNG stream that drives loot and generation.
/// Each input is one atomic state transition.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    level: u32,
    board: Board,
    character: Character,
    journal: Journal,
    facing: Option<Direction>,
    phase: SessionPhase,
    rng: SmallRng,
}

impl GameSession {
    /// Starts a session with the stock configuration; the avatar comes
    /// from the character picker.
    pub fn new(avatar: &str, seed: u64) -> Result<Self> {
        Self::with_config(avatar, GameConfig::default(), seed)
    }

    pub fn with_config(avatar: &str, config: GameConfig, seed: u64) -> Result<Self> {
        let origin = (config.size.0 / 2, config.size.1 / 2);
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Self::generate_board(&mut rng, config, 1, origin)?;

        Ok(Self {
            config,
            level: 1,
            board,
            character: Character::new(origin, config.starting_health, avatar),
            journal: Journal::default(),
            facing: None,
            phase: SessionPhase::Active,
            rng,
        })
    }

    /// Starts a session over a fixed layout instead of a generated one.
    /// The layout must match `config.size`; the character starts
    /// centered with the safe zone pre-revealed, as in a generated
    /// level.
    pub fn from_layout(
        avatar: &str,
        config: GameConfig,
        layout: LevelLayout,
        seed: u64,
    ) -> Result<Self> {
        if layout.size() != config.size {
            return Err(GameError::OutOfBounds);
        }

        let origin = (config.size.0 / 2, config.size.1 / 2);
        let mut board = Board::new(layout);
        board.reveal_safe_zone(origin);

        Ok(Self {
            config,
            level: 1,
            board,
            character: Character::new(origin, config.starting_health, avatar),
            journal: Journal::default(),
            facing: None,
            phase: SessionPhase::Active,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn generate_board(
        rng: &mut SmallRng,
        config: GameConfig,
        level: u32,
        origin: Coord2,
    ) -> Result<Board> {
        let layout = RandomLevelGenerator::new(rng.random(), origin).generate(config, level)?;
        let mut board = Board::new(layout);
        board.reveal_safe_zone(origin);
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> CellSnapshot {
        self.board.snapshot_at(coords)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, SessionPhase::Over)
    }

    /// Applies one input as one atomic state transition.
    pub fn handle_input(&mut self, input: Input) -> TurnOutcome {
        use Input::*;

        if self.is_over() {
            log::trace!("input {:?} ignored, session is over", input);
            return TurnOutcome::default();
        }

        match input {
            Up => self.step(Direction::Up),
            Down => self.step(Direction::Down),
            Left => self.step(Direction::Left),
            Right => self.step(Direction::Right),
            UpLeft => self.step(Direction::UpLeft),
            UpRight => self.step(Direction::UpRight),
            DownLeft => self.step(Direction::DownLeft),
            DownRight => self.step(Direction::DownRight),
            ToggleFlag => self.toggle_facing_flag(),
            Descend => self.explicit_descend(),
        }
    }

    /// Movement, with dig-before-move on unrevealed destinations. The
    /// position commits even onto a mine cell; a move fully absorbed by
    /// the edge changes nothing at all.
    fn step(&mut self, direction: Direction) -> TurnOutcome {
        let from = self.character.position;
        let dest = self.character.step_target(direction, self.size());
        self.facing = Some(direction);

        if dest == from {
            return TurnOutcome::default();
        }

        let mut outcome = TurnOutcome {
            moved: true,
            ..TurnOutcome::default()
        };

        if self.board.state_at(dest).is_unrevealed() {
            match self.board.dig(dest, &mut self.rng) {
                Ok(dig) => {
                    self.apply_dig(dig);
                    outcome.dig = Some(dig);
                }
                Err(err) => log::warn!("dig at {:?} rejected: {}", dest, err),
            }
        }

        self.character.position = dest;

        if matches!(self.phase, SessionPhase::Active)
            && matches!(self.config.descend, DescendTrigger::Automatic)
            && self.board.layout().is_downstairs(dest)
        {
            outcome.level_changed = self.descend();
        }

        outcome
    }

    fn apply_dig(&mut self, dig: DigOutcome) {
        if dig.hit_mine {
            self.character.health -= MINE_DAMAGE;
            self.journal
                .push(format!("-{} HP", MINE_DAMAGE), LogKind::Damage);
            log::debug!("mine hit, health now {}", self.character.health);

            if self.character.health <= 0 {
                self.phase = SessionPhase::Over;
                log::debug!("health exhausted, session over");
            }
            return;
        }

        if let Some(kind) = dig.loot {
            self.character.collect(kind);
            self.journal.push(format!("Found {}!", kind), LogKind::Points);
        }
        self.character.award_points(dig.cells_revealed);
    }

    /// Regenerates the board one level down, keeping the character in
    /// place and carving the new safe zone around it.
    fn descend(&mut self) -> bool {
        let origin = self.character.position;

        match Self::generate_board(&mut self.rng, self.config, self.level + 1, origin) {
            Ok(board) => {
                self.level += 1;
                self.board = board;
                self.journal
                    .push(format!("Descended to level {}!", self.level), LogKind::Points);
                log::debug!("descended to level {}", self.level);
                true
            }
            Err(err) => {
                // only reachable on configs whose density ramp outgrows
                // the board; stay on the current level
                log::warn!("level generation failed: {}", err);
                false
            }
        }
    }

    fn explicit_descend(&mut self) -> TurnOutcome {
        if !matches!(self.config.descend, DescendTrigger::Explicit) {
            return TurnOutcome::default();
        }
        if !self.board.layout().is_downstairs(self.character.position) {
            return TurnOutcome::default();
        }

        TurnOutcome {
            level_changed: self.descend(),
            ..TurnOutcome::default()
        }
    }

    /// Flags the cell the avatar is facing (its last movement
    /// direction). No target yet, an edge-absorbed target, or a
    /// revealed target all leave the board untouched.
    fn toggle_facing_flag(&mut self) -> TurnOutcome {
        let Some(direction) = self.facing else {
            return TurnOutcome::default();
        };

        let target = self.character.step_target(direction, self.size());
        if target == self.character.position {
            return TurnOutcome::default();
        }

        let flag_toggled = self
            .board
            .toggle_flag(target)
            .map_or(false, FlagOutcome::has_update);

        TurnOutcome {
            flag_toggled,
            ..TurnOutcome::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVATAR: &str = "🧙‍♂️";

    fn quiet_config(size: Coord2) -> GameConfig {
        GameConfig {
            downstairs: false,
            ..GameConfig::new(size, MineDensity::flat(0.0))
        }
    }

    /// 5x5 session, one mine in the far corner, character centered.
    fn cornered_session() -> GameSession {
        let config = quiet_config((5, 5));
        let layout = LevelLayout::from_mine_coords((5, 5), &[(0, 0)], None).unwrap();
        GameSession::from_layout(AVATAR, config, layout, 0).unwrap()
    }

    #[test]
    fn new_game_starts_centered_with_the_safe_zone_open() {
        let session = GameSession::new(AVATAR, 42).unwrap();

        assert_eq!(session.level(), 1);
        assert_eq!(session.character().position, (12, 10));
        assert_eq!(session.character().health, STARTING_HEALTH);
        assert_eq!(session.character().points, 0);
        assert!(!session.is_over());
        assert_eq!(session.board().layout().mine_count(), 100);

        for coords in safe_zone((12, 10), session.size()) {
            assert!(matches!(
                session.cell_at(coords),
                CellSnapshot::Open { .. }
            ));
        }
    }

    #[test]
    fn same_seed_replays_the_same_game() {
        let a = GameSession::new(AVATAR, 7).unwrap();
        let b = GameSession::new(AVATAR, 7).unwrap();

        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn walking_into_a_mine_costs_twenty_health_and_no_points() {
        let mut session = cornered_session();

        // everything but the mine's rim is pre-revealed by the flood
        let outcome = session.handle_input(Input::UpLeft);
        assert_eq!(session.character().position, (1, 1));
        assert!(outcome.moved);

        let points_before = session.character().points;
        let outcome = session.handle_input(Input::UpLeft);

        assert_eq!(session.character().position, (0, 0));
        assert!(outcome.dig.unwrap().hit_mine);
        assert_eq!(session.character().health, STARTING_HEALTH - MINE_DAMAGE);
        assert_eq!(session.character().points, points_before);

        let latest = session.journal().latest().unwrap();
        assert_eq!(latest.text, "-20 HP");
        assert_eq!(latest.kind, LogKind::Damage);
        assert_eq!(session.cell_at((0, 0)), CellSnapshot::Exploded);
    }

    #[test]
    fn revealed_mines_do_not_damage_again() {
        let mut session = cornered_session();

        session.handle_input(Input::UpLeft);
        session.handle_input(Input::UpLeft);
        let health = session.character().health;

        // step off and back onto the exploded cell
        session.handle_input(Input::Right);
        session.handle_input(Input::Left);

        assert_eq!(session.character().health, health);
    }

    #[test]
    fn moves_into_the_edge_are_absorbed_silently() {
        let config = quiet_config((5, 5));
        let layout = LevelLayout::from_mine_coords((5, 5), &[], None).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();

        session.handle_input(Input::Up);
        session.handle_input(Input::Up);
        let before = session.character().clone();

        let outcome = session.handle_input(Input::Up);

        assert_eq!(outcome, TurnOutcome::default());
        assert_eq!(session.character(), &before);
        assert_eq!(session.journal().len(), 0);
    }

    #[test]
    fn digging_awards_points_for_the_revealed_cell() {
        // (0, 0) is walled off by two mines, so the opening flood
        // leaves it hidden and a later dig reveals exactly one cell
        let config = quiet_config((5, 5));
        let layout = LevelLayout::from_mine_coords((5, 5), &[(1, 0), (0, 1)], None).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();

        assert_eq!(session.cell_at((0, 0)), CellSnapshot::Hidden);

        session.handle_input(Input::UpLeft); // to (1, 1), already open
        let points_before = session.character().points;
        let outcome = session.handle_input(Input::UpLeft);
        let dig = outcome.dig.unwrap();

        assert!(!dig.hit_mine);
        assert_eq!(dig.cells_revealed, 1);
        assert_eq!(session.cell_at((0, 0)), CellSnapshot::Open {
            adjacent_mines: 2,
            is_downstairs: false
        });
        assert_eq!(
            session.character().points,
            points_before + u32::from(dig.cells_revealed)
        );
    }

    #[test]
    fn lethal_mine_ends_the_session_terminally() {
        let config = GameConfig {
            starting_health: MINE_DAMAGE,
            ..quiet_config((5, 5))
        };
        let layout = LevelLayout::from_mine_coords((5, 5), &[(0, 0)], None).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();

        session.handle_input(Input::UpLeft);
        session.handle_input(Input::UpLeft);

        assert_eq!(session.character().health, 0);
        assert!(session.is_over());
        assert_eq!(session.phase(), SessionPhase::Over);

        // dead avatars do not move
        let before = session.character().position;
        let outcome = session.handle_input(Input::Right);
        assert_eq!(outcome, TurnOutcome::default());
        assert_eq!(session.character().position, before);
    }

    #[test]
    fn flag_input_toggles_the_facing_cell() {
        let mut session = cornered_session();

        // no facing yet
        assert_eq!(session.handle_input(Input::ToggleFlag), TurnOutcome::default());

        session.handle_input(Input::UpLeft); // now at (1, 1), facing up-left
        let outcome = session.handle_input(Input::ToggleFlag);

        assert!(outcome.flag_toggled);
        assert_eq!(session.cell_at((0, 0)), CellSnapshot::Flagged);

        // digging the flagged cell is refused, so walking in is safe
        let health = session.character().health;
        session.handle_input(Input::UpLeft);
        assert_eq!(session.character().health, health);
        assert_eq!(session.character().position, (0, 0));
    }

    #[test]
    fn double_toggle_restores_the_cell_and_revealed_cells_are_immune() {
        let mut session = cornered_session();

        session.handle_input(Input::UpLeft);
        session.handle_input(Input::ToggleFlag);
        let outcome = session.handle_input(Input::ToggleFlag);

        assert!(outcome.flag_toggled);
        assert_eq!(session.cell_at((0, 0)), CellSnapshot::Hidden);

        // face a revealed cell instead: toggle is a no-op
        session.handle_input(Input::Down);
        let outcome = session.handle_input(Input::ToggleFlag);
        assert!(!outcome.flag_toggled);
    }

    #[test]
    fn stepping_onto_the_stairs_descends_once() {
        let config = GameConfig {
            downstairs: true,
            ..GameConfig::new((9, 9), MineDensity::flat(0.1))
        };
        let layout = LevelLayout::from_mine_coords((9, 9), &[], Some((5, 4))).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();
        assert_eq!(session.character().position, (4, 4));

        let outcome = session.handle_input(Input::Right);

        assert!(outcome.level_changed);
        assert_eq!(session.level(), 2);
        assert_eq!(session.character().position, (5, 4));

        let latest = session.journal().latest().unwrap();
        assert_eq!(latest.text, "Descended to level 2!");
        assert_eq!(latest.kind, LogKind::Points);

        // fresh board: exact mine count for level 2, safe zone around
        // the character open and clean
        let layout = session.board().layout();
        assert_eq!(layout.mine_count(), config.mine_count(2));
        for coords in safe_zone((5, 4), session.size()) {
            assert!(!layout.contains_mine(coords));
            assert!(matches!(
                session.cell_at(coords),
                CellSnapshot::Open { .. }
            ));
        }
    }

    #[test]
    fn descend_input_is_inert_under_automatic_stairs() {
        let config = GameConfig {
            downstairs: true,
            ..GameConfig::new((9, 9), MineDensity::flat(0.1))
        };
        let layout = LevelLayout::from_mine_coords((9, 9), &[], Some((5, 4))).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();

        assert_eq!(session.handle_input(Input::Descend), TurnOutcome::default());
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn explicit_stairs_wait_for_the_descend_input() {
        let config = GameConfig {
            downstairs: true,
            descend: DescendTrigger::Explicit,
            ..GameConfig::new((9, 9), MineDensity::flat(0.1))
        };
        let layout = LevelLayout::from_mine_coords((9, 9), &[], Some((5, 4))).unwrap();
        let mut session = GameSession::from_layout(AVATAR, config, layout, 0).unwrap();

        let outcome = session.handle_input(Input::Right);
        assert!(!outcome.level_changed);
        assert_eq!(session.level(), 1);

        // descend only works while standing on the stairs
        session.handle_input(Input::Right);
        assert_eq!(session.handle_input(Input::Descend), TurnOutcome::default());

        session.handle_input(Input::Left);
        let outcome = session.handle_input(Input::Descend);
        assert!(outcome.level_changed);
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn found_loot_lands_in_the_inventory_and_the_feed() {
        // brute-force a seed whose dig finds loot; the walled-off
        // corner keeps (0, 0) hidden until the avatar digs it
        let config = quiet_config((5, 5));

        for seed in 0..200 {
            let layout = LevelLayout::from_mine_coords((5, 5), &[(1, 0), (0, 1)], None).unwrap();
            let mut session = GameSession::from_layout(AVATAR, config, layout, seed).unwrap();

            session.handle_input(Input::UpLeft);
            let outcome = session.handle_input(Input::UpLeft);

            if let Some(kind) = outcome.dig.and_then(|dig| dig.loot) {
                assert_eq!(session.character().inventory.get(&kind), Some(&1));
                let latest = session.journal().latest().unwrap();
                assert_eq!(latest.text, format!("Found {}!", kind));
                assert_eq!(latest.kind, LogKind::Points);
                return;
            }
        }

        panic!("no loot in 200 seeded digs, ladder must be broken");
    }
}
