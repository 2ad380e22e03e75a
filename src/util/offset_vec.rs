use std::fmt;

/// Elements which take up some number of offsets in an [`OffsetVec`]
pub trait Width {
    fn width(&self) -> usize;
}

/// Offset into an [`OffsetVec`]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Offset(pub usize);

/// Vector indexed by offsets, where each element advances the offset by its width
///
/// This is the shape of the class file constant pool: indices start at 1 and `long`/`double`
/// entries use up two indices. Offsets landing inside a wide element have no element.
#[derive(Clone, PartialEq)]
pub struct OffsetVec<T> {
    elements: Vec<T>,

    /// For every offset starting at `first_offset`, the index of the element starting there
    starts: Vec<Option<usize>>,
    first_offset: usize,
}

impl<T: Width> OffsetVec<T> {
    pub fn new_starting_at(first_offset: Offset) -> OffsetVec<T> {
        OffsetVec {
            elements: vec![],
            starts: vec![],
            first_offset: first_offset.0,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Offset the next pushed element will get
    pub fn offset_len(&self) -> Offset {
        Offset(self.first_offset + self.starts.len())
    }

    pub fn push(&mut self, element: T) -> Offset {
        let offset = self.offset_len();
        self.starts.push(Some(self.elements.len()));
        for _ in 1..element.width() {
            self.starts.push(None);
        }
        self.elements.push(element);
        offset
    }

    pub fn get_offset(&self, offset: Offset) -> Option<&T> {
        let slot = offset.0.checked_sub(self.first_offset)?;
        let index = (*self.starts.get(slot)?)?;
        self.elements.get(index)
    }

    /// Elements in order, with their offsets
    pub fn iter(&self) -> impl Iterator<Item = (Offset, &T)> + '_ {
        self.starts
            .iter()
            .enumerate()
            .filter_map(move |(slot, start)| {
                start.map(|index| (Offset(self.first_offset + slot), &self.elements[index]))
            })
    }
}

impl<T: fmt::Debug> fmt::Debug for OffsetVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (slot, start) in self.starts.iter().enumerate() {
            if let Some(index) = start {
                let offset = self.first_offset + slot;
                list.entry(&format_args!("#{} = {:?}", offset, self.elements[*index]));
            }
        }
        list.finish()
    }
}
