//! Hospital network fixtures with hand-checked optima.

use icuplan_core::{
    Catalog, ConsumableRecord, EquipmentRecord, FacilityRecord, StaffRecord, TransferCostTable,
};

/// A catalog paired with the bed demand it is planned against.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub catalog: Catalog,
    pub demand: f64,
}

impl Scenario {
    pub fn new(catalog: Catalog, demand: f64) -> Self {
        Self { catalog, demand }
    }
}

/// Catalog with a uniform transfer cost table sized to its contents.
pub fn catalog(
    facilities: Vec<FacilityRecord>,
    equipment: Vec<EquipmentRecord>,
    staff: Vec<StaffRecord>,
    consumables: Vec<ConsumableRecord>,
    transfer_cost: f64,
) -> Catalog {
    let requirements = equipment.len() + staff.len() + consumables.len();
    let transfer_costs = TransferCostTable::uniform(requirements, facilities.len(), transfer_cost);
    Catalog {
        facilities,
        equipment,
        staff,
        consumables,
        transfer_costs,
    }
}

/// One built facility (0..=10 beds) stocked for exactly five beds.
///
/// Optimum: 5 beds, nothing bought, cost 0.
pub fn scenario_a() -> Scenario {
    Scenario::new(
        catalog(
            vec![FacilityRecord::new("central", true, 0, 10)
                .with_equipment("ventilator", 5, 0)
                .with_staff("nurse", 10)],
            vec![EquipmentRecord::new("ventilator", 5000.0, 1.0, 100.0)],
            vec![StaffRecord::new("nurse", 3000.0, 2.0)],
            vec![],
            25.0,
        ),
        5.0,
    )
}

/// `north` holds ten ventilators, built `south` needs at least four beds
/// but holds none, and unbuilt `field` would cost 1000 to open.
///
/// Optimum: four ventilators move north to south for 40; `field` stays
/// closed and nothing is bought.
pub fn scenario_b() -> Scenario {
    Scenario::new(
        catalog(
            vec![
                FacilityRecord::new("north", true, 0, 10).with_equipment("ventilator", 10, 0),
                FacilityRecord::new("south", true, 4, 10),
                FacilityRecord::new("field", false, 0, 10).with_construction_cost(1000.0),
            ],
            vec![EquipmentRecord::new("ventilator", 5000.0, 1.0, 0.0)],
            vec![],
            vec![],
            10.0,
        ),
        8.0,
    )
}

/// Demand of 25 against bed ceilings summing to 18.
pub fn scenario_c() -> Scenario {
    Scenario::new(
        catalog(
            vec![
                FacilityRecord::new("east", true, 0, 10).with_equipment("ventilator", 10, 0),
                FacilityRecord::new("west", false, 0, 8).with_construction_cost(500.0),
            ],
            vec![EquipmentRecord::new("ventilator", 100.0, 1.0, 5.0)],
            vec![],
            vec![],
            1.0,
        ),
        25.0,
    )
}

/// Repairable ventilators with zero broken units and a free repair.
///
/// Optimum: buy three ventilators at `central` (cost 3000); every repair
/// variable is zero.
pub fn scenario_d() -> Scenario {
    Scenario::new(
        catalog(
            vec![
                FacilityRecord::new("central", true, 0, 10)
                    .with_equipment("ventilator", 3, 0)
                    .with_consumable("mask", 100),
                FacilityRecord::new("annex", false, 0, 6)
                    .with_construction_cost(2500.0)
                    .with_equipment("ventilator", 0, 0),
            ],
            vec![EquipmentRecord::new("ventilator", 1000.0, 1.0, 0.0)],
            vec![],
            vec![ConsumableRecord::new("mask", 0.5, 4.0)],
            2000.0,
        ),
        6.0,
    )
}

/// One built facility fixed at five beds with two working ventilators
/// and three awaiting repair.
///
/// Per-unit repair pricing costs 3 x 10 = 30; pricing by broken-unit
/// count costs 3 x 3 = 9.
pub fn repair_mix() -> Scenario {
    Scenario::new(
        catalog(
            vec![FacilityRecord::new("central", true, 5, 5).with_equipment("ventilator", 2, 3)],
            vec![EquipmentRecord::new("ventilator", 1000.0, 1.0, 10.0)],
            vec![],
            vec![],
            50.0,
        ),
        5.0,
    )
}

/// A regional network of seven built hospitals and three field sites,
/// stocking two kinds of equipment, nurses and oxygen, planned against
/// 45 beds.
///
/// Built bed ceilings sum to 68, so no field site has to open. Stock is
/// uneven: some hospitals hold spare ventilators while others need
/// transfers, repairs or purchases. There is no hand-checked optimum;
/// the network is sized to exercise the search rather than the arithmetic.
pub fn regional_network() -> Scenario {
    let mut facilities = Vec::with_capacity(10);
    for i in 0..7_i64 {
        let upper = 8 + (i % 3) as u32 * 2;
        facilities.push(
            FacilityRecord::new(format!("hospital-{}", i + 1), true, 2, upper)
                .with_equipment("ventilator", 3 + i % 4 * 2, i % 3)
                .with_equipment("monitor", 5 + i % 2 * 3, i % 2)
                .with_staff("nurse", 8 + i % 5 * 2)
                .with_consumable("oxygen", 30 + 6 * i),
        );
    }
    for j in 0..3_u32 {
        facilities.push(
            FacilityRecord::new(format!("field-{}", j + 1), false, 4, 12)
                .with_construction_cost(20_000.0 + 5_000.0 * f64::from(j)),
        );
    }

    Scenario::new(
        catalog(
            facilities,
            vec![
                EquipmentRecord::new("ventilator", 5000.0, 1.0, 150.0),
                EquipmentRecord::new("monitor", 800.0, 1.0, 60.0),
            ],
            vec![StaffRecord::new("nurse", 3000.0, 2.0)],
            vec![ConsumableRecord::new("oxygen", 20.0, 3.0)],
            15.0,
        ),
        45.0,
    )
}
