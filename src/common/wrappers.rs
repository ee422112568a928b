//! Zero-cost wrappers for safe indexing.

wrap_usize! {
    #[doc = "Predicate indices, over the whole alphabet."]
    PrdIdx
    #[doc = "Ordered set of predicates."]
    set: PrdSet
    #[doc = "Total map from predicates to something."]
    map: PrdMap
}

wrap_usize! {
    #[doc = "Location (category) indices."]
    LocIdx
    #[doc = "Total map from locations to something."]
    map: LocMap
}

wrap_usize! {
    #[doc = "Data point indices, into the point arena."]
    PntIdx
    #[doc = "Ordered set of data points."]
    set: PntSet
    #[doc = "Total map from data points to something."]
    map: PntMap
}

wrap_usize! {
    #[doc = "Horn constraint indices."]
    CstrIdx
    #[doc = "Ordered set of constraints."]
    set: CstrSet
    #[doc = "Total map from constraints to something."]
    map: CstrMap
}
