#![warn(missing_docs)]
//! The ordered optical system with its fill/sort invariant
use std::{cell::RefCell, collections::HashMap, fmt::Display};

use log::debug;
use rayon::prelude::*;

use crate::{
    elements::{Element, ElementKind, OpticalOperator, Propagator},
    error::{BeamResult, BeamlineError},
    screen::Screen,
    source::Source,
    trace::RayTrace,
};

/// An ordered collection of optical operators between a [`Source`] and a [`Screen`].
///
/// The system owns the chain invariant: after [`OpticalSystem::fill`], every pair of
/// axially adjacent physical elements (and the source/first and last/screen boundaries)
/// is connected by exactly one synthesized [`Propagator`] spanning exactly their gap, and
/// the chain is ordered by strictly descending `z` (source at the largest `z`, screen at
/// the smallest, propagator distances signed accordingly).
///
/// Construction fills immediately. Mutations through [`OpticalSystem::add`] and
/// [`OpticalSystem::remove`] do *not* re-fill automatically; callers must invoke
/// [`OpticalSystem::fill`] again before tracing.
#[derive(Debug, Clone)]
pub struct OpticalSystem {
    label: String,
    source: Source,
    screen: Screen,
    operators: Vec<Element>,
    index: RefCell<Option<HashMap<String, Vec<usize>>>>,
}
impl OpticalSystem {
    /// Create a new [`OpticalSystem`] from the given physical operators.
    ///
    /// The operator list may be given in any order; the system is filled (and thereby
    /// sorted) immediately.
    ///
    /// # Errors
    ///
    /// This function returns an error if two supplied operators share a label or if
    /// [`OpticalSystem::fill`] fails.
    pub fn new(
        label: &str,
        source: Source,
        operators: Vec<Element>,
        screen: Screen,
    ) -> BeamResult<Self> {
        for (i, operator) in operators.iter().enumerate() {
            if operators[..i].iter().any(|o| o.label() == operator.label()) {
                return Err(BeamlineError::Lookup(format!(
                    "label \"{}\" is used by more than one operator",
                    operator.label()
                )));
            }
        }
        let mut system = Self {
            label: label.to_owned(),
            source,
            screen,
            operators,
            index: RefCell::new(None),
        };
        system.fill()?;
        Ok(system)
    }
    /// Returns the label of this [`OpticalSystem`].
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
    /// Returns a reference to the source of this [`OpticalSystem`].
    #[must_use]
    pub const fn source(&self) -> &Source {
        &self.source
    }
    /// Returns a mutable reference to the source of this [`OpticalSystem`].
    ///
    /// Moving the launch plane invalidates the chain; call [`OpticalSystem::fill`]
    /// afterwards.
    pub fn source_mut(&mut self) -> &mut Source {
        &mut self.source
    }
    /// Returns a reference to the screen of this [`OpticalSystem`].
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }
    /// Returns a mutable reference to the screen of this [`OpticalSystem`].
    ///
    /// Moving the screen invalidates the chain; call [`OpticalSystem::fill`] afterwards.
    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }
    /// Returns the ordered operator chain of this [`OpticalSystem`].
    #[must_use]
    pub fn operators(&self) -> &[Element] {
        &self.operators
    }
    /// Returns the number of operators (physical and synthesized) in this system.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }
    /// Returns `true` if this system contains no operators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
    /// Returns the number of operators of the given kind in this system.
    #[must_use]
    pub fn count(&self, kind: ElementKind) -> usize {
        self.operators
            .iter()
            .filter(|operator| operator.kind() == kind)
            .count()
    }
    fn invalidate_index(&mut self) {
        *self.index.get_mut() = None;
    }
    fn with_index<T>(&self, f: impl FnOnce(&HashMap<String, Vec<usize>>) -> T) -> T {
        let mut cache = self.index.borrow_mut();
        let map = cache.get_or_insert_with(|| {
            let mut map: HashMap<String, Vec<usize>> = HashMap::new();
            for (idx, operator) in self.operators.iter().enumerate() {
                map.entry(operator.label().to_owned()).or_default().push(idx);
            }
            map
        });
        f(map)
    }
    fn position(&self, label: &str) -> BeamResult<usize> {
        self.with_index(|map| match map.get(label) {
            Some(positions) if positions.len() == 1 => Ok(positions[0]),
            Some(positions) => Err(BeamlineError::Lookup(format!(
                "cannot determine which operator to return: {} matches for label \"{label}\" in system \"{}\"",
                positions.len(),
                self.label
            ))),
            None => Err(BeamlineError::Lookup(format!(
                "no operator with label \"{label}\" in system \"{}\"",
                self.label
            ))),
        })
    }
    /// Look up an operator by its label.
    ///
    /// Lookup is backed by a lazily rebuilt label index, so repeated lookups are O(1)
    /// amortized.
    ///
    /// # Errors
    ///
    /// This function will return an error if no operator carries the given label or the
    /// label is ambiguous (used more than once).
    pub fn operator(&self, label: &str) -> BeamResult<&Element> {
        let idx = self.position(label)?;
        Ok(&self.operators[idx])
    }
    /// Look up an operator by its label, mutably.
    ///
    /// # Errors
    ///
    /// This function will return an error if no operator carries the given label or the
    /// label is ambiguous (used more than once).
    pub fn operator_mut(&mut self, label: &str) -> BeamResult<&mut Element> {
        let idx = self.position(label)?;
        // the caller may relabel the element through the returned reference
        self.invalidate_index();
        Ok(&mut self.operators[idx])
    }
    /// Add a physical operator to this system.
    ///
    /// The chain is *not* re-filled automatically.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element's label is already used within
    /// this system.
    pub fn add(&mut self, element: impl Into<Element>) -> BeamResult<()> {
        let element = element.into();
        let duplicate = self.with_index(|map| map.contains_key(element.label()));
        if duplicate {
            return Err(BeamlineError::Lookup(format!(
                "label \"{}\" already used in system \"{}\"",
                element.label(),
                self.label
            )));
        }
        self.operators.push(element);
        self.invalidate_index();
        Ok(())
    }
    /// Remove the operator with the given label from this system and return it.
    ///
    /// The chain is *not* re-filled automatically.
    ///
    /// # Errors
    ///
    /// This function will return an error if no operator carries the given label or the
    /// label is ambiguous.
    pub fn remove(&mut self, label: &str) -> BeamResult<Element> {
        let idx = self.position(label)?;
        self.invalidate_index();
        Ok(self.operators.remove(idx))
    }
    /// Sort the operators by descending axial position.
    ///
    /// This is an ascending stable sort followed by a reversal rather than a descending
    /// sort: the pair leaves equal-`z` ties in *reversed* insertion order, which places
    /// each synthesized propagator ahead of the physical element sharing its `z` in the
    /// downstream direction.
    pub fn sort_operators(&mut self) {
        self.operators.sort_by(|a, b| a.z().total_cmp(&b.z()));
        self.operators.reverse();
        self.invalidate_index();
    }
    /// (Re-)synthesize the free-space propagators of this system.
    ///
    /// All existing propagators are discarded, the physical operators are sorted by
    /// descending `z`, and one propagator per gap is synthesized: `S0` from the launch
    /// plane to the first element, `S1 … S(n−1)` between adjacent elements and `Sn` from
    /// the last element to the screen, each positioned at its downstream neighbor's `z`
    /// with the signed gap as its distance. A system without physical elements degenerates
    /// to the single propagator `S0` spanning source to screen.
    ///
    /// Calling `fill` twice without an intervening structural change yields an identical
    /// chain.
    ///
    /// # Errors
    ///
    /// This function will return an error if a synthesized label would collide with a
    /// physical operator's label (the chain invariant requires unique labels). The system
    /// is left without propagators in that case; relabel the offending element and fill
    /// again.
    pub fn fill(&mut self) -> BeamResult<()> {
        self.operators.retain(|operator| !operator.is_propagator());
        self.sort_operators();
        let mut propagators = Vec::new();
        if self.operators.is_empty() {
            propagators.push(Propagator::new(
                "S0",
                self.screen.z() - self.source.z(),
                self.screen.z(),
            )?);
        } else {
            let first = &self.operators[0];
            propagators.push(Propagator::new(
                "S0",
                first.z() - self.source.z(),
                first.z(),
            )?);
            for (i, pair) in self.operators.windows(2).enumerate() {
                propagators.push(Propagator::new(
                    &format!("S{}", i + 1),
                    pair[1].z() - pair[0].z(),
                    pair[1].z(),
                )?);
            }
            let last = &self.operators[self.operators.len() - 1];
            propagators.push(Propagator::new(
                &format!("S{}", self.operators.len()),
                self.screen.z() - last.z(),
                self.screen.z(),
            )?);
        }
        for propagator in &propagators {
            if self
                .operators
                .iter()
                .any(|operator| operator.label() == propagator.label())
            {
                return Err(BeamlineError::Lookup(format!(
                    "cannot fill system \"{}\": synthesized label \"{}\" is already used by a physical operator",
                    self.label,
                    propagator.label()
                )));
            }
        }
        debug!(
            "filled system \"{}\" with {} propagator(s)",
            self.label,
            propagators.len()
        );
        self.operators.extend(propagators.into_iter().map(Element::from));
        self.sort_operators();
        Ok(())
    }
    /// Trace one batch of emitted rays through the current chain.
    ///
    /// For every ray returned by the source one [`RayTrace`] (labeled `RT0, RT1, …`) is
    /// seeded and traced through the chain in order. The traces are computed in parallel
    /// (safe since batch tracing never writes operator positions back) and returned in
    /// emission order.
    ///
    /// # Errors
    ///
    /// This function will return an error if an individual trace fails.
    pub fn trace(&self) -> BeamResult<Vec<RayTrace>> {
        let chain = &self.operators;
        self.source
            .emit()
            .into_par_iter()
            .enumerate()
            .map(|(i, initial_ray)| {
                let mut ray_trace = RayTrace::seeded(initial_ray, &format!("RT{i}"));
                ray_trace.trace(chain)?;
                Ok(ray_trace)
            })
            .collect()
    }
}
impl Display for OpticalSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:\n-{}", self.label, self.source)?;
        for operator in &self.operators {
            write!(f, "\n-{operator}")?;
        }
        write!(f, "\n-{}", self.screen)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, elements::Deflector, elements::Lens};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;

    fn lens_system() -> OpticalSystem {
        OpticalSystem::new(
            "test system",
            Source::new(100.0, vec![degree!(0.0)]).unwrap(),
            vec![Lens::new("L1", 10.0, 50.0).unwrap().into()],
            Screen::new(0.0).unwrap(),
        )
        .unwrap()
    }
    fn chain_shape(system: &OpticalSystem) -> Vec<(ElementKind, f64, f64)> {
        system
            .operators()
            .iter()
            .map(|operator| (operator.kind(), operator.z(), operator.value()))
            .collect()
    }
    #[test]
    fn new_fills_immediately() {
        let system = lens_system();
        let labels = system
            .operators()
            .iter()
            .map(|operator| operator.label().to_owned())
            .collect::<Vec<_>>();
        // the propagator reaching the lens precedes it in the chain despite the shared z
        assert_eq!(labels, vec!["S0", "L1", "S1"]);
        assert_eq!(system.count(ElementKind::Propagator), 2);
        assert_eq!(system.count(ElementKind::Lens), 1);
    }
    #[test]
    fn new_rejects_duplicate_labels() {
        let result = OpticalSystem::new(
            "test system",
            Source::new(100.0, vec![degree!(0.0)]).unwrap(),
            vec![
                Lens::new("L1", 10.0, 50.0).unwrap().into(),
                Lens::new("L1", 20.0, 30.0).unwrap().into(),
            ],
            Screen::new(0.0).unwrap(),
        );
        assert_matches!(result, Err(BeamlineError::Lookup(_)));
    }
    #[test]
    fn fill_empty_system() {
        let system = OpticalSystem::new(
            "empty",
            Source::new(100.0, vec![degree!(0.0)]).unwrap(),
            vec![],
            Screen::new(0.0).unwrap(),
        )
        .unwrap();
        assert_eq!(system.len(), 1);
        let propagator = system.operator("S0").unwrap();
        assert_eq!(propagator.kind(), ElementKind::Propagator);
        assert_abs_diff_eq!(propagator.value(), -100.0);
        assert_abs_diff_eq!(propagator.z(), 0.0);
    }
    #[test]
    fn fill_is_idempotent() {
        let mut system = lens_system();
        let once = chain_shape(&system);
        system.fill().unwrap();
        assert_eq!(chain_shape(&system), once);
    }
    #[test]
    fn fill_completeness() {
        let mut system = OpticalSystem::new(
            "column",
            Source::new(100.0, vec![degree!(0.0)]).unwrap(),
            vec![
                Lens::new("L1", 10.0, 90.0).unwrap().into(),
                Deflector::new("D1", degree!(0.0), 80.0).unwrap().into(),
                Lens::new("L2", 10.0, 65.0).unwrap().into(),
            ],
            Screen::new(-100.0).unwrap(),
        )
        .unwrap();
        let gap_sum: f64 = system
            .operators()
            .iter()
            .filter(|operator| operator.is_propagator())
            .map(OpticalOperator::value)
            .sum();
        assert_relative_eq!(gap_sum, system.screen().z() - system.source().z());
        // re-fill after moving an element keeps the chain gapless
        system.operator_mut("D1").unwrap().set_z(70.0).unwrap();
        system.fill().unwrap();
        let gap_sum: f64 = system
            .operators()
            .iter()
            .filter(|operator| operator.is_propagator())
            .map(OpticalOperator::value)
            .sum();
        assert_relative_eq!(gap_sum, -200.0);
        assert_eq!(system.count(ElementKind::Propagator), 4);
    }
    #[test]
    fn fill_rejects_synthesized_label_collision() {
        let result = OpticalSystem::new(
            "collision",
            Source::new(100.0, vec![degree!(0.0)]).unwrap(),
            vec![Lens::new("S0", 10.0, 50.0).unwrap().into()],
            Screen::new(0.0).unwrap(),
        );
        assert_matches!(result, Err(BeamlineError::Lookup(_)));
    }
    #[test]
    fn lookup() {
        let system = lens_system();
        assert_eq!(system.operator("L1").unwrap().kind(), ElementKind::Lens);
        assert_matches!(system.operator("nope"), Err(BeamlineError::Lookup(_)));
    }
    #[test]
    fn lookup_ambiguous_after_relabel() {
        let mut system = lens_system();
        // relabeling through the mutable lookup creates a duplicate the index must see
        system
            .operator_mut("S1")
            .unwrap()
            .attr_mut()
            .set_label("L1");
        assert_matches!(system.operator("L1"), Err(BeamlineError::Lookup(_)));
    }
    #[test]
    fn add_and_remove() {
        let mut system = lens_system();
        system
            .add(Lens::new("L2", 5.0, 25.0).unwrap())
            .unwrap();
        // no automatic re-fill on add
        assert_eq!(system.count(ElementKind::Propagator), 2);
        system.fill().unwrap();
        assert_eq!(system.count(ElementKind::Propagator), 3);
        assert_matches!(
            system.add(Lens::new("L2", 5.0, 25.0).unwrap()),
            Err(BeamlineError::Lookup(_))
        );
        let removed = system.remove("L2").unwrap();
        assert_eq!(removed.label(), "L2");
        assert_matches!(system.remove("L2"), Err(BeamlineError::Lookup(_)));
        system.fill().unwrap();
        assert_eq!(system.count(ElementKind::Lens), 1);
        assert_eq!(system.count(ElementKind::Propagator), 2);
    }
    #[test]
    fn trace_center_ray() {
        let system = lens_system();
        let traces = system.trace().unwrap();
        assert_eq!(traces.len(), 1);
        let rays = traces[0].rays();
        assert_eq!(rays.len(), 4);
        for ray in rays {
            assert_abs_diff_eq!(ray.x(), 0.0);
            assert_abs_diff_eq!(ray.angle_rad(), 0.0);
        }
        let z_positions = rays.iter().map(crate::ray::Ray::z).collect::<Vec<_>>();
        assert_eq!(z_positions, vec![100.0, 50.0, 50.0, 0.0]);
    }
    #[test]
    fn trace_off_axis_ray() {
        let mut system = lens_system();
        system.source_mut().set_offset(5.0).unwrap();
        let traces = system.trace().unwrap();
        let rays = traces[0].rays();
        // Δ = 0 − 5 = −5 at the lens, kick = asin(5/√125)
        let kick = (5.0 / 125.0_f64.sqrt()).asin();
        assert_relative_eq!(rays[2].angle_rad(), kick, max_relative = 1e-12);
        assert_abs_diff_eq!(rays[2].x(), 5.0);
        // the refracted ray crosses the axis at the back focal plane and reaches x = −20
        assert_relative_eq!(rays[3].x(), 5.0 + kick.tan() * (-50.0), max_relative = 1e-12);
        assert_relative_eq!(rays[3].x(), -20.0, max_relative = 1e-12);
    }
    #[test]
    fn trace_order_matches_emission() {
        let mut system = lens_system();
        system
            .source_mut()
            .set_angles(vec![degree!(-0.2), degree!(0.2)])
            .unwrap();
        let traces = system.trace().unwrap();
        assert_eq!(traces.len(), 2);
        assert_eq!(traces[0].label(), "RT0");
        assert_eq!(traces[1].label(), "RT1");
        assert_relative_eq!(traces[0].rays()[0].angle_deg(), -0.2, max_relative = 1e-12);
        assert_relative_eq!(traces[1].rays()[0].angle_deg(), 0.2, max_relative = 1e-12);
        for trace in &traces {
            assert_eq!(trace.len(), 1 + system.len());
        }
    }
    #[test]
    fn display() {
        let system = lens_system();
        let rendered = system.to_string();
        assert!(rendered.starts_with("test system:"));
        assert!(rendered.contains("lens \"L1\""));
        assert!(rendered.contains("Screen"));
    }
}
