//! Authority scope applied as a query predicate.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::ColumnTrait;
use uuid::Uuid;

use crate::domain::AuthorityScope;

/// Translate a caller's scope into a WHERE condition over an entity's
/// geography and owner columns. `None` means unrestricted.
pub(crate) fn scope_condition<C: ColumnTrait>(
    scope: AuthorityScope,
    region: C,
    zone: C,
    woreda: C,
    owner: C,
) -> Option<SimpleExpr> {
    match scope {
        AuthorityScope::All => None,
        AuthorityScope::Region(id) => Some(region.eq(id)),
        AuthorityScope::Zone(id) => Some(zone.eq(id)),
        AuthorityScope::Woreda(id) => Some(woreda.eq(id)),
        AuthorityScope::Own(user_id) => Some(owner.eq(user_id)),
    }
}

/// Scope for entities without geography columns: admins see everything,
/// everyone else sees their own rows.
pub(crate) fn owner_condition<C: ColumnTrait>(
    scope: AuthorityScope,
    owner: C,
) -> Option<SimpleExpr> {
    match scope {
        AuthorityScope::All => None,
        AuthorityScope::Own(user_id) => Some(owner.eq(user_id)),
        // Geography admins have no standing on ungeographic entities
        AuthorityScope::Region(_) | AuthorityScope::Zone(_) | AuthorityScope::Woreda(_) => {
            Some(owner.eq(Uuid::nil()))
        }
    }
}
