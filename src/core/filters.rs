use crate::models::Person;

/// Check whether two people may be newly paired
///
/// Requires different teams, different sites, and no recorded history in
/// either direction. History need not be symmetric: one side listing the
/// other is enough to exclude the pair.
#[inline]
pub fn is_eligible(a: &Person, b: &Person) -> bool {
    different_teams(a, b) && different_sites(a, b) && !met_before(a, b)
}

#[inline]
pub fn different_teams(a: &Person, b: &Person) -> bool {
    a.team != b.team
}

#[inline]
pub fn different_sites(a: &Person, b: &Person) -> bool {
    a.site != b.site
}

#[inline]
pub fn met_before(a: &Person, b: &Person) -> bool {
    a.has_met(&b.key()) || b.has_met(&a.key())
}
