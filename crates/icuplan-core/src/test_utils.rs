//! Catalog fixtures shared by this crate's unit tests.

use crate::domain::{
    Catalog, ConsumableRecord, EquipmentRecord, FacilityRecord, StaffRecord, TransferCostTable,
};

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

/// Two built hospitals and one site that could be built, stocking a
/// ventilator, nurses and masks.
pub fn small_network() -> Catalog {
    catalog(
        vec![
            FacilityRecord::new("h1", true, 2, 10)
                .with_equipment("vent", 6, 2)
                .with_staff("nurse", 8)
                .with_consumable("mask", 40),
            FacilityRecord::new("h2", true, 0, 8)
                .with_equipment("vent", 1, 0)
                .with_staff("nurse", 2),
            FacilityRecord::new("site", false, 4, 12)
                .with_construction_cost(1000.0)
                .with_equipment("vent", 9, 9)
                .with_staff("nurse", 9),
        ],
        vec![EquipmentRecord::new("vent", 5000.0, 1.0, 200.0)],
        vec![StaffRecord::new("nurse", 3000.0, 1.0)],
        vec![ConsumableRecord::new("mask", 2.0, 4.0)],
        10.0,
    )
}
