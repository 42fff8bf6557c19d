//! Tests for domain records.

use super::*;
use crate::DataError;

#[test]
fn test_requirement_ref_display() {
    assert_eq!(
        RequirementRef::equipment("ventilator").to_string(),
        "equipment.ventilator"
    );
    assert_eq!(RequirementRef::staff("nurse").to_string(), "staff.nurse");
    assert!(RequirementKind::Equipment.is_repairable());
    assert!(!RequirementKind::Consumable.is_repairable());
}

#[test]
fn test_id_table_rejects_duplicates() {
    let mut table = IdTable::new();
    assert_eq!(table.insert(FacilityId::new("h1")), Ok(0));
    assert_eq!(table.insert(FacilityId::new("h2")), Ok(1));
    assert_eq!(
        table.insert(FacilityId::new("h1")),
        Err(FacilityId::new("h1"))
    );
    assert_eq!(table.index_of(&FacilityId::new("h2")), Some(1));
    assert_eq!(table.id(0).as_str(), "h1");
    assert_eq!(table.len(), 2);
}

#[test]
fn test_catalog_requirement_order() {
    let mut catalog = Catalog::new();
    catalog.consumables.push(ConsumableRecord::new("mask", 1.0, 4.0));
    catalog.staff.push(StaffRecord::new("nurse", 3000.0, 0.5));
    catalog
        .equipment
        .push(EquipmentRecord::new("vent", 5000.0, 1.0, 100.0));

    let refs = catalog.requirement_refs();
    assert_eq!(
        refs,
        vec![
            RequirementRef::equipment("vent"),
            RequirementRef::staff("nurse"),
            RequirementRef::consumable("mask"),
        ]
    );
    assert_eq!(catalog.requirement_count(), 3);
}

#[test]
fn test_catalog_json_defaults() {
    let json = r#"{
        "facilities": [
            {
                "id": "h1",
                "built": true,
                "upper_beds": 20,
                "holdings": {
                    "equipment": { "vent": { "working": 4 } },
                    "staff": { "nurse": 10 }
                }
            }
        ],
        "equipment": [
            { "id": "vent", "unit_price": 5000, "necessary_rate": 1, "maintenance_cost": 150 }
        ],
        "staff": [
            { "id": "nurse", "salary": 3000, "necessary_rate": 0.5, "shift_hours": 12 }
        ]
    }"#;

    let catalog: Catalog = serde_json::from_str(json).unwrap();
    let facility = &catalog.facilities[0];
    assert_eq!(facility.lower_beds, 0);
    assert_eq!(facility.construction_cost, 0.0);
    assert_eq!(
        facility.holdings.equipment[&RequirementId::new("vent")],
        EquipmentHolding {
            working: 4,
            needing_repair: 0
        }
    );
    assert_eq!(catalog.equipment[0].repair_cost, 150.0);
    assert_eq!(catalog.staff[0].shift_hours, Some(12));
    assert!(catalog.consumables.is_empty());
    assert!(catalog.transfer_costs.is_empty());
}

#[test]
fn test_rate_overrides_lookup() {
    let overrides = RateOverrides::new()
        .with(RequirementRef::staff("nurse"), 0.25)
        .with(RequirementRef::equipment("vent"), 2.0);

    assert_eq!(overrides.get(&RequirementRef::staff("nurse")), Some(0.25));
    assert_eq!(overrides.get(&RequirementRef::consumable("nurse")), None);
    assert!(!overrides.is_empty());

    let entries = overrides.entries();
    assert_eq!(entries[0].0, RequirementRef::equipment("vent"));
    assert_eq!(entries[1].0, RequirementRef::staff("nurse"));
}

#[test]
fn test_transfer_table_parse_text() {
    let text = "0 3\n4 0\n\n0 7\n8 0\n";
    let table = TransferCostTable::parse_text(text, 2, 2).unwrap();
    assert_eq!(table.shape(), (2, 2, 2));
    assert_eq!(table.cost(0, 0, 1), 3.0);
    assert_eq!(table.cost(1, 1, 0), 8.0);
    assert!(table.validate(2, 2).is_ok());
}

#[test]
fn test_transfer_table_parse_errors() {
    assert!(matches!(
        TransferCostTable::parse_text("0 1\n", 1, 2),
        Err(DataError::Parse(_))
    ));
    assert!(matches!(
        TransferCostTable::parse_text("0 x\n1 0\n", 1, 2),
        Err(DataError::Parse(_))
    ));
    assert!(matches!(
        TransferCostTable::parse_text("0 1 2\n1 0 2\n", 1, 2),
        Err(DataError::Parse(_))
    ));
    assert!(matches!(
        TransferCostTable::parse_text("0 1\n1 0\n5 5\n", 1, 2),
        Err(DataError::Parse(_))
    ));
}

#[test]
fn test_transfer_table_validate() {
    let table = TransferCostTable::uniform(1, 3, 10.0);
    assert_eq!(
        table.validate(2, 3),
        Err(DataError::TransferTableShape {
            expected: (2, 3, 3),
            found: (1, 3, 3),
        })
    );

    let ragged = TransferCostTable::new(vec![vec![vec![0.0, 1.0], vec![1.0]]]);
    assert_eq!(ragged.shape(), (1, 2, 1));

    let negative = TransferCostTable::new(vec![vec![vec![0.0, -1.0], vec![1.0, 0.0]]]);
    assert!(matches!(
        negative.validate(1, 2),
        Err(DataError::NegativeCost { .. })
    ));

    // the diagonal is never read
    let diagonal = TransferCostTable::new(vec![vec![vec![f64::NAN, 1.0], vec![1.0, -5.0]]]);
    assert!(diagonal.validate(1, 2).is_ok());
}

#[test]
fn test_closure_demand_source() {
    let source = |horizon: u32| -> Result<f64, crate::DemandError> { Ok(horizon as f64 * 2.0) };
    assert_eq!(source.demand(7), Ok(14.0));
}
