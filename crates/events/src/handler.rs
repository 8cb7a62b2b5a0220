/// Execute an aggregate command deterministically (no IO, no async).
///
/// Provides the canonical lifecycle:
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (pure, no mutation)
/// 2. **Evolve**: applies each event to the aggregate via `aggregate.apply(event)`
///
/// The aggregate is mutated in place. Delivering the returned events to
/// listeners is left to the caller (typically through an
/// [`EventDispatcher`](crate::EventDispatcher)).
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: assetdesk_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
