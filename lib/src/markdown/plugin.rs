use pulldown_cmark::Event;

/// A stage in the Markdown event pipeline.
///
/// Plugins see the event stream produced by the previous stage and yield the
/// stream the next stage consumes. The default is the identity.
pub trait Plugin {
    #[inline(always)]
    fn remap<'a, I>(&'a mut self, events: I) -> impl Iterator<Item = Event<'a>> + 'a
        where I: Iterator<Item = Event<'a>> + 'a
    {
        events
    }
}
