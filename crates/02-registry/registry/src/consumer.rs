use fragment::Fragment;

/// Takes ownership of fragments and renders them.
///
/// Any `FnMut(Fragment)` closure is a consumer.
pub trait FragmentConsumer {
    fn consume(&mut self, fragment: Fragment);
}

impl<F> FragmentConsumer for F
where
    F: FnMut(Fragment),
{
    fn consume(&mut self, fragment: Fragment) {
        self(fragment)
    }
}

/// Type-erased consumer for registries whose consumer type is chosen at
/// runtime.
pub type BoxedConsumer = Box<dyn FnMut(Fragment) + Send>;

/// Consumer that keeps every fragment it receives, in delivery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collector {
    fragments: Vec<Fragment>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }
}

impl FragmentConsumer for Collector {
    fn consume(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }
}
