use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::{Disk, Polygon};
use crate::placement::{validate_tolerance, MultiPlacement, SinglePlacement, DEFAULT_TOLERANCE};
use crate::placer::group::{seed_for_group, PendingTokens, TokenRequest, WHOLE_REGION};
use crate::placer::regions::RegionMap;
use crate::placer::report::{PlacementOutcome, PlacementReport, PlacementWarning};
use crate::placer::store::{TokenRecord, TokenStore};
use crate::placer::tokens::TokenSizes;
use crate::sampling::RejectionSampler;
use crate::search::{
    search_with_events, EventSink, GeneticConfig, SearchBudget, SearchEvent, SearchEventKind,
    SearchStrategy,
};

/// Configuration for placing tokens.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Allowed uncovered share of a disk's area for it to count as contained.
    pub tolerance: f64,
    /// Strategy used when a single token is placed.
    pub single_strategy: SearchStrategy,
    /// Strategy used when several tokens are placed jointly.
    pub multi_strategy: SearchStrategy,
    /// Extra limits applied to every search.
    pub budget: SearchBudget,
    /// Sampler for random initial states.
    pub sampler: RejectionSampler,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            single_strategy: SearchStrategy::Genetic(GeneticConfig::default()),
            multi_strategy: SearchStrategy::Genetic(GeneticConfig::new(75, 0.2, 100)),
            budget: SearchBudget::default(),
            sampler: RejectionSampler::default(),
        }
    }
}

impl PlacementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the containment tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the strategy for single-token placement.
    pub fn with_single_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.single_strategy = strategy;
        self
    }

    /// Sets the strategy for joint placement.
    pub fn with_multi_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.multi_strategy = strategy;
        self
    }

    /// Sets the search budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the initial-state sampler.
    pub fn with_sampler(mut self, sampler: RejectionSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)?;
        self.single_strategy.validate()?;
        self.multi_strategy.validate()?;
        self.budget.validate()
    }
}

/// Places one disk of `radius` inside `target`, avoiding `forbidden`.
pub fn place_single(
    config: &PlacementConfig,
    target: &Polygon,
    forbidden: &[Polygon],
    radius: f64,
    rng: &mut impl RngCore,
    sink: &mut dyn EventSink,
) -> Result<PlacementOutcome> {
    let problem = SinglePlacement::new(target, forbidden, radius, config.tolerance)?
        .with_sampler(config.sampler);
    let solution =
        search_with_events(&problem, &config.single_strategy, &config.budget, rng, sink)?;
    let feasibility = problem.assess(solution.state);
    let positions = vec![solution.state];
    Ok(PlacementOutcome::from_solution(solution, positions, feasibility))
}

/// Places one disk per entry of `radii` jointly inside `target`, avoiding `forbidden` and
/// each other. Positions come back in radius order.
pub fn place_multiple(
    config: &PlacementConfig,
    target: &Polygon,
    forbidden: &[Polygon],
    radii: Vec<f64>,
    rng: &mut impl RngCore,
    sink: &mut dyn EventSink,
) -> Result<PlacementOutcome> {
    let problem = MultiPlacement::new(target, forbidden, radii, config.tolerance)?
        .with_sampler(config.sampler);
    let solution =
        search_with_events(&problem, &config.multi_strategy, &config.budget, rng, sink)?;
    let feasibility = problem.assess(&solution.state);
    let positions = solution.state.clone();
    Ok(PlacementOutcome::from_solution(solution, positions, feasibility))
}

/// Target polygon and forbidden zones of one placement group.
#[derive(Debug, Clone)]
pub struct PreparedTarget {
    pub target: Polygon,
    pub forbidden: Vec<Polygon>,
}

/// Places tokens on a map of named regions and records the results in a [`TokenStore`].
#[derive(Debug, Clone)]
pub struct Placer {
    regions: RegionMap,
    sizes: TokenSizes,
    config: PlacementConfig,
    exclusion_zones: Vec<Polygon>,
}

impl Placer {
    pub fn try_new(
        regions: RegionMap,
        sizes: TokenSizes,
        config: PlacementConfig,
    ) -> Result<Self> {
        config.validate()?;
        sizes.validate()?;
        Ok(Self {
            regions,
            sizes,
            config,
            exclusion_zones: Vec::new(),
        })
    }

    /// Adds a zone every placement avoids, whatever its area.
    pub fn with_exclusion_zone(mut self, zone: Polygon) -> Self {
        self.exclusion_zones.push(zone);
        self
    }

    pub fn add_exclusion_zone(&mut self, zone: Polygon) {
        self.exclusion_zones.push(zone);
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn regions(&self) -> &RegionMap {
        &self.regions
    }

    pub fn sizes(&self) -> &TokenSizes {
        &self.sizes
    }

    /// Builds the target and forbidden zones for `area` and `sub_region`.
    ///
    /// The target is the area polygon, clipped to the sub-region polygon unless the
    /// sub-region is [`WHOLE_REGION`]. Forbidden zones are the disks of tokens already stored
    /// for the group plus the placer's exclusion zones.
    pub fn prepare(
        &self,
        store: &TokenStore,
        area: &str,
        sub_region: &str,
    ) -> Result<PreparedTarget> {
        let area_polygon = self.regions.polygon(area)?;
        let target = if sub_region == WHOLE_REGION {
            area_polygon.clone()
        } else {
            let sub_polygon = self.regions.polygon(sub_region)?;
            area_polygon.intersection(sub_polygon).ok_or_else(|| {
                Error::InvalidGeometry(format!(
                    "area '{area}' and sub-region '{sub_region}' do not overlap"
                ))
            })?
        };

        let mut forbidden = Vec::with_capacity(self.exclusion_zones.len());
        for record in store.records(area, sub_region) {
            let radius = self.sizes.radius_of(&record.token)?;
            forbidden.push(Disk::new(record.position(), radius).to_polygon());
        }
        forbidden.extend(self.exclusion_zones.iter().cloned());

        debug!(
            "Prepared '{}/{}': target area {:.1}, {} forbidden zones.",
            area,
            sub_region,
            target.area(),
            forbidden.len()
        );
        Ok(PreparedTarget { target, forbidden })
    }

    /// Places `requests` into `area`/`sub_region` and writes their records to `store`.
    pub fn place_tokens(
        &self,
        store: &mut TokenStore,
        area: &str,
        sub_region: &str,
        requests: &[TokenRequest],
        rng: &mut impl RngCore,
    ) -> Result<PlacementReport> {
        self.place_tokens_with_events(store, area, sub_region, requests, rng, &mut ())
    }

    /// Like [`Placer::place_tokens`], reporting search progress and warnings to `sink`.
    ///
    /// One request is placed on its own, several are placed jointly. Records are written
    /// index-matched to `requests`; existing records are never removed.
    pub fn place_tokens_with_events(
        &self,
        store: &mut TokenStore,
        area: &str,
        sub_region: &str,
        requests: &[TokenRequest],
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PlacementReport> {
        if requests.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "no tokens requested for '{area}/{sub_region}'"
            )));
        }

        let radii = requests
            .iter()
            .map(|r| self.sizes.radius_of(&r.token))
            .collect::<Result<Vec<f64>>>()?;
        let PreparedTarget { target, forbidden } = self.prepare(store, area, sub_region)?;

        let outcome = if radii.len() == 1 {
            place_single(&self.config, &target, &forbidden, radii[0], rng, sink)?
        } else {
            place_multiple(&self.config, &target, &forbidden, radii, rng, sink)?
        };

        for (request, &position) in requests.iter().zip(&outcome.positions) {
            let kind = self.sizes.kind_of(&request.token).ok().cloned();
            store.insert(
                area,
                sub_region,
                TokenRecord::new(request.token.clone(), kind, position, request.amount),
            );
        }

        let warnings = self.collect_warnings(area, sub_region, requests, &outcome, sink);
        info!(
            "Placed {} token(s) in '{}/{}' | cost: {:.3} | iterations: {} | stop: {}.",
            requests.len(),
            area,
            sub_region,
            outcome.cost,
            outcome.iterations,
            outcome.stop_reason
        );

        Ok(PlacementReport {
            area: area.to_string(),
            sub_region: sub_region.to_string(),
            tokens: requests.iter().map(|r| r.token.clone()).collect(),
            outcome,
            warnings,
        })
    }

    /// Places every wanted token that has no record in `store` yet.
    ///
    /// Groups run in sorted area and sub-region order, each with its own generator seeded by
    /// [`seed_for_group`], so a group's result does not depend on which other groups were
    /// pending. Point regions are skipped.
    ///
    /// The first failing group aborts the call with its error. Groups placed before it stay
    /// in `store`, so calling again with the same `wanted` resumes with the missing tokens.
    pub fn place_pending(
        &self,
        store: &mut TokenStore,
        wanted: &PendingTokens,
        base_seed: u64,
    ) -> Result<Vec<PlacementReport>> {
        self.place_pending_with_events(store, wanted, base_seed, &mut ())
    }

    /// Like [`Placer::place_pending`], reporting to `sink`.
    pub fn place_pending_with_events(
        &self,
        store: &mut TokenStore,
        wanted: &PendingTokens,
        base_seed: u64,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<PlacementReport>> {
        let mut reports = Vec::new();
        for (area, sub_regions) in wanted {
            if self.regions.is_point(area) {
                debug!("Skipping point region '{}'.", area);
                continue;
            }
            for (sub_region, tokens) in sub_regions {
                let requests: Vec<TokenRequest> = tokens
                    .iter()
                    .filter(|(token, _)| !store.contains(area, sub_region, token))
                    .map(|(token, &amount)| TokenRequest::new(token.clone(), amount))
                    .collect();
                if requests.is_empty() {
                    continue;
                }

                let mut rng = StdRng::seed_from_u64(seed_for_group(base_seed, area, sub_region));
                let report = self
                    .place_tokens_with_events(store, area, sub_region, &requests, &mut rng, sink)
                    .inspect_err(|err| {
                        warn!(
                            "Placing pending tokens in '{}/{}' failed after {} group(s): {}.",
                            area,
                            sub_region,
                            reports.len(),
                            err
                        );
                    })?;
                reports.push(report);
            }
        }

        info!(
            "Placed pending tokens: {} group(s), {} token(s).",
            reports.len(),
            reports.iter().map(|r| r.tokens.len()).sum::<usize>()
        );
        Ok(reports)
    }

    fn collect_warnings(
        &self,
        area: &str,
        sub_region: &str,
        requests: &[TokenRequest],
        outcome: &PlacementOutcome,
        sink: &mut dyn EventSink,
    ) -> Vec<PlacementWarning> {
        let mut warnings = Vec::new();
        for index in outcome.feasibility.infeasible_tokens() {
            let measures = &outcome.feasibility.tokens[index];
            let warning = PlacementWarning::Infeasible {
                area: area.to_string(),
                sub_region: sub_region.to_string(),
                token: requests[index].token.clone(),
                contained_fraction: measures.contained_fraction,
                forbidden_overlap: measures.forbidden_overlap,
                token_overlap: measures.token_overlap,
            };
            warn!("{}.", warning);
            if sink.wants(SearchEventKind::Warning) {
                sink.send(SearchEvent::Warning {
                    context: format!("{area}/{sub_region}"),
                    message: warning.to_string(),
                });
            }
            warnings.push(warning);
        }
        warnings
    }
}
