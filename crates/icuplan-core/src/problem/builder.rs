//! Merges a catalog snapshot, demand and rate overrides into a [`Problem`].

use tracing::{info, warn};

use super::Problem;
use crate::domain::{
    Catalog, Category, DemandSource, Facility, FacilityId, FacilityRecord, IdTable,
    RateOverrides, Requirement, RequirementKind, RequirementRef,
};
use crate::error::DataError;

const HOURS_PER_WEEK: u32 = 7 * 24;

/// Builder for a [`Problem`].
///
/// # Example
///
/// ```
/// use icuplan_core::{Catalog, EquipmentRecord, FacilityRecord, ProblemBuilder, TransferCostTable};
///
/// let mut catalog = Catalog::new();
/// catalog.facilities.push(FacilityRecord::new("h1", true, 0, 10).with_equipment("vent", 6, 0));
/// catalog.equipment.push(EquipmentRecord::new("vent", 5000.0, 1.0, 100.0));
/// catalog.transfer_costs = TransferCostTable::uniform(1, 1, 0.0);
///
/// let problem = ProblemBuilder::new(&catalog).demand(5.0).build().unwrap();
/// assert_eq!(problem.facility_count(), 1);
/// assert_eq!(problem.beds_in_service(0), 6.0);
/// ```
pub struct ProblemBuilder<'a> {
    catalog: &'a Catalog,
    rate_overrides: RateOverrides,
    demand: Option<f64>,
    demand_source: Option<(&'a dyn DemandSource, u32)>,
}

impl<'a> ProblemBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            rate_overrides: RateOverrides::default(),
            demand: None,
            demand_source: None,
        }
    }

    pub fn rate_overrides(mut self, overrides: RateOverrides) -> Self {
        self.rate_overrides = overrides;
        self
    }

    /// Caller-supplied demand; bypasses the demand source entirely.
    pub fn demand(mut self, demand: impl Into<Option<f64>>) -> Self {
        self.demand = demand.into();
        self
    }

    /// Source consulted with `horizon` when no explicit demand is set.
    pub fn demand_source(mut self, source: &'a dyn DemandSource, horizon: u32) -> Self {
        self.demand_source = Some((source, horizon));
        self
    }

    pub fn build(self) -> Result<Problem, DataError> {
        let catalog = self.catalog;

        let (requirement_ids, requirements, repairable_count) =
            build_requirements(catalog, &self.rate_overrides)?;

        for (key, _) in self.rate_overrides.entries() {
            if requirement_ids.index_of(&key).is_none() {
                warn!(
                    event = "unknown_rate_override",
                    requirement = %key,
                    "rate override ignored: not in catalog"
                );
            }
        }

        let mut facility_ids = IdTable::new();
        let mut facilities = Vec::with_capacity(catalog.facilities.len());
        let mut holdings = Vec::with_capacity(catalog.facilities.len());
        let mut needing_repair = Vec::with_capacity(catalog.facilities.len());

        for record in &catalog.facilities {
            facility_ids
                .insert(record.id.clone())
                .map_err(DataError::DuplicateFacility)?;
            facilities.push(build_facility(record)?);

            let (working, broken) = build_holdings(record, &requirement_ids, repairable_count)?;
            holdings.push(working);
            needing_repair.push(broken);
        }

        let transfer_costs = catalog.transfer_costs.clone();
        transfer_costs.validate(requirements.len(), facilities.len())?;

        let demand = match (self.demand, self.demand_source) {
            (Some(demand), _) => demand,
            (None, Some((source, horizon))) => source.demand(horizon)?,
            (None, None) => return Err(DataError::MissingDemand),
        };
        if !demand.is_finite() {
            return Err(DataError::InvalidDemand(demand));
        }
        if demand < 0.0 {
            return Err(DataError::NegativeDemand(demand));
        }

        info!(
            event = "problem_built",
            facilities = facilities.len(),
            built = facilities.iter().filter(|f| f.built).count(),
            requirements = requirements.len(),
            repairable = repairable_count,
            demand,
        );

        Ok(Problem {
            facility_ids,
            facilities,
            requirement_ids,
            requirements,
            repairable_count,
            holdings,
            needing_repair,
            transfer_costs,
            rate_overrides: self.rate_overrides,
            demand,
        })
    }
}

type RequirementSet = (IdTable<RequirementRef>, Vec<Requirement>, usize);

fn build_requirements(
    catalog: &Catalog,
    overrides: &RateOverrides,
) -> Result<RequirementSet, DataError> {
    let mut ids = IdTable::new();
    let mut requirements = Vec::with_capacity(catalog.requirement_count());

    let mut push = |requirement: Requirement| -> Result<(), DataError> {
        ids.insert(requirement.key.clone())
            .map_err(DataError::DuplicateRequirement)?;
        requirements.push(requirement);
        Ok(())
    };

    for record in &catalog.equipment {
        let key = RequirementRef::new(RequirementKind::Equipment, record.id.as_str());
        check_cost(&format!("unit price of `{key}`"), record.unit_price)?;
        check_cost(&format!("repair cost of `{key}`"), record.repair_cost)?;
        let rate = overrides.get(&key).unwrap_or(record.necessary_rate);
        let rate = check_rate(&key, rate)?;
        push(Requirement {
            key,
            name: record.name.clone(),
            unit_price: record.unit_price,
            necessary_rate: rate,
            category: Category::Repairable {
                repair_cost: record.repair_cost,
            },
        })?;
    }
    let repairable_count = catalog.equipment.len();

    for record in &catalog.staff {
        let key = RequirementRef::new(RequirementKind::Staff, record.id.as_str());
        check_cost(&format!("salary of `{key}`"), record.salary)?;
        let per_shift = overrides.get(&key).unwrap_or(record.necessary_rate);
        let rate = match record.shift_hours {
            Some(0) => return Err(DataError::ZeroShift(key)),
            Some(hours) => f64::from(HOURS_PER_WEEK.div_ceil(hours)) * per_shift,
            None => per_shift,
        };
        let rate = check_rate(&key, rate)?;
        push(Requirement {
            key,
            name: record.team.clone(),
            unit_price: record.salary,
            necessary_rate: rate,
            category: Category::NonRepairable,
        })?;
    }

    for record in &catalog.consumables {
        let key = RequirementRef::new(RequirementKind::Consumable, record.id.as_str());
        check_cost(&format!("unit price of `{key}`"), record.unit_price)?;
        let rate = overrides.get(&key).unwrap_or(record.necessary_rate);
        let rate = check_rate(&key, rate)?;
        push(Requirement {
            key,
            name: record.name.clone(),
            unit_price: record.unit_price,
            necessary_rate: rate,
            category: Category::NonRepairable,
        })?;
    }

    Ok((ids, requirements, repairable_count))
}

fn build_facility(record: &FacilityRecord) -> Result<Facility, DataError> {
    if record.upper_beds == 0 || record.lower_beds > record.upper_beds {
        return Err(DataError::InvalidBedBounds {
            facility: record.id.clone(),
            lower: record.lower_beds,
            upper: record.upper_beds,
        });
    }
    check_cost(
        &format!("construction cost of `{}`", record.id),
        record.construction_cost,
    )?;

    Ok(Facility {
        id: record.id.clone(),
        name: record.name.clone(),
        built: record.built,
        lower_beds: record.lower_beds,
        upper_beds: record.upper_beds,
        construction_cost: if record.built {
            0.0
        } else {
            record.construction_cost
        },
    })
}

/// Returns `(working[R+N], needing_repair[R])`. Entries are validated for
/// every facility but only kept for built ones.
fn build_holdings(
    record: &FacilityRecord,
    requirement_ids: &IdTable<RequirementRef>,
    repairable_count: usize,
) -> Result<(Vec<u64>, Vec<u64>), DataError> {
    let mut working = vec![0u64; requirement_ids.len()];
    let mut broken = vec![0u64; repairable_count];

    let locate = |kind: RequirementKind,
                  id: &str,
                  field: &'static str,
                  value: i64|
     -> Result<(usize, u64), DataError> {
        let requirement = RequirementRef::new(kind, id);
        let Some(r) = requirement_ids.index_of(&requirement) else {
            return Err(DataError::UnknownRequirement {
                facility: record.id.clone(),
                requirement,
            });
        };
        let Ok(units) = u64::try_from(value) else {
            return Err(DataError::NegativeHolding {
                facility: record.id.clone(),
                requirement,
                field,
                value,
            });
        };
        Ok((r, units))
    };

    let holdings = &record.holdings;
    for (id, holding) in &holdings.equipment {
        let (r, units) = locate(
            RequirementKind::Equipment,
            id.as_str(),
            "working units",
            holding.working,
        )?;
        working[r] = units;
        let (r, units) = locate(
            RequirementKind::Equipment,
            id.as_str(),
            "units needing repair",
            holding.needing_repair,
        )?;
        broken[r] = units;
    }
    for (id, &count) in &holdings.staff {
        let (r, units) = locate(RequirementKind::Staff, id.as_str(), "headcount", count)?;
        working[r] = units;
    }
    for (id, &count) in &holdings.consumables {
        let (r, units) = locate(RequirementKind::Consumable, id.as_str(), "stock", count)?;
        working[r] = units;
    }

    if !record.built {
        working.fill(0);
        broken.fill(0);
    }

    Ok((working, broken))
}

fn check_cost(what: &str, value: f64) -> Result<(), DataError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DataError::NegativeCost {
            what: what.to_string(),
            value,
        })
    }
}

fn check_rate(requirement: &RequirementRef, rate: f64) -> Result<f64, DataError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(DataError::InvalidRate {
            requirement: requirement.clone(),
            value: rate,
        })
    }
}
