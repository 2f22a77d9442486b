use battle_core::{
    BattleConfig, BattleError, BoardError, Climate, CombatantSpec, EntityId, ErrorSeverity, Item,
    Position, Scenario, ScenarioError, SpawnError, Team,
};

fn scenario() -> Scenario {
    Scenario::new(BattleConfig::with_board_size(4, 3), Climate::Rain).with_seed(5)
}

#[test]
fn builds_battlefield_from_specs() {
    let mut blue = CombatantSpec::new(1, Team::Blue, Position::new(0, 0));
    blue.items = vec![Item::Leftovers];
    blue.mana = 250;
    blue.shield = 12;
    let red = CombatantSpec::new(2, Team::Red, Position::new(3, 2));

    let field = scenario().with_combatant(blue).with_combatant(red).build().unwrap();

    assert_eq!(field.board().width(), 4);
    assert_eq!(field.board().height(), 3);
    let blue = field.combatant(EntityId(1)).unwrap();
    assert!(blue.holds(Item::Leftovers));
    assert_eq!(blue.mana, 100);
    assert_eq!(blue.shield, 12);
    assert_eq!(field.occupant(Position::new(3, 2)).map(|c| c.id), Some(EntityId(2)));
}

#[test]
fn rejects_out_of_bounds_placement() {
    let err = scenario()
        .with_combatant(CombatantSpec::new(1, Team::Blue, Position::new(4, 0)))
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        ScenarioError::Spawn(SpawnError::Board(BoardError::OutOfBounds(Position::new(4, 0))))
    );
    assert_eq!(err.severity(), ErrorSeverity::Validation);
}

#[test]
fn rejects_shared_cells_and_duplicate_ids() {
    let occupied = scenario()
        .with_combatant(CombatantSpec::new(1, Team::Blue, Position::new(1, 1)))
        .with_combatant(CombatantSpec::new(2, Team::Red, Position::new(1, 1)))
        .build()
        .unwrap_err();
    assert_eq!(occupied.error_code(), "BOARD_OCCUPIED");
    assert!(occupied.severity().is_recoverable());

    let duplicate = scenario()
        .with_combatant(CombatantSpec::new(1, Team::Blue, Position::new(0, 0)))
        .with_combatant(CombatantSpec::new(1, Team::Red, Position::new(2, 2)))
        .build()
        .unwrap_err();
    assert_eq!(duplicate, ScenarioError::Spawn(SpawnError::DuplicateId(EntityId(1))));
}

#[test]
fn rejects_duplicate_items() {
    let mut spec = CombatantSpec::new(7, Team::Red, Position::new(0, 0));
    spec.items = vec![Item::ManaCharm, Item::ManaCharm];

    let err = scenario().with_combatant(spec).build().unwrap_err();
    assert_eq!(err.error_code(), "ITEM_DUPLICATE");
    assert_eq!(err.to_string(), "combatant #7: item mana_charm is already held");
}

#[test]
fn rejects_empty_and_oversized_boards() {
    let huge = Scenario::new(BattleConfig::with_board_size(65_536, 65_537), Climate::Neutral)
        .with_combatant(CombatantSpec::new(1, Team::Blue, Position::new(0, 1)));
    let err = huge.build().unwrap_err();
    assert_eq!(err, ScenarioError::InvalidBoard { width: 65_536, height: 65_537 });
    assert_eq!(err.error_code(), "SCENARIO_INVALID_BOARD");
    assert_eq!(err.severity(), ErrorSeverity::Validation);

    let wide = Scenario::new(BattleConfig::with_board_size(4097, 1), Climate::Neutral);
    assert!(matches!(wide.build(), Err(ScenarioError::InvalidBoard { .. })));

    let empty = Scenario::new(BattleConfig::with_board_size(0, 6), Climate::Neutral);
    assert!(matches!(empty.build(), Err(ScenarioError::InvalidBoard { width: 0, height: 6 })));

    let largest = Scenario::new(BattleConfig::with_board_size(64, 64), Climate::Neutral);
    assert_eq!(largest.build().unwrap().board().width(), 64);
}
