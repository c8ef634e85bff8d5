/// A growable list of `usize` with a `clear` that resets length to zero
/// without releasing capacity.
///
/// This replaces the "one `Vec` per bucket, reallocated every update"
/// idiom with arena-style reuse: `PbwtUpdater` keeps one `IntList` per
/// allele value and clears (never reallocates) them every marker.
#[derive(Debug, Clone, Default)]
pub struct IntList {
    data: Vec<usize>,
}

impl IntList {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, value: usize) {
        self.data.push(value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> usize {
        self.data[i]
    }

    /// Resets length to 0. Capacity is retained for reuse on the next marker.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Read-only view of the current contents.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.data
    }

    /// Appends `self`'s contents onto `out`, in order.
    pub fn copy_into(&self, out: &mut Vec<usize>) {
        out.extend_from_slice(&self.data);
    }
}
