//! Multi-image set policy.
//!
//! LINE delivers a multi-image send as one event per image, each tagged with
//! its 1-based index and the set total. Only the first four images of a set
//! are kept, and only the event for the last kept image gets a reply.

use weddingwall_types::event::ImageSetMembership;

/// Maximum number of images kept from one multi-image send.
pub const MAX_IMAGES_PER_SET: u32 = 4;

/// What to do with one image event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePlan {
    pub index: u32,
    pub total: u32,
    /// Download and store the image.
    pub process: bool,
    /// This event sends the (single) reply for its set.
    pub reply: bool,
}

impl ImagePlan {
    /// Index of the last image that will be processed in this set.
    pub fn last_processed_index(&self) -> u32 {
        self.total.min(MAX_IMAGES_PER_SET)
    }
}

/// Plan one image event. Standalone images count as index 1 of 1.
pub fn plan_image(set: Option<&ImageSetMembership>) -> ImagePlan {
    let (index, total) = set.map(|s| (s.index, s.total)).unwrap_or((1, 1));
    let process = index <= MAX_IMAGES_PER_SET;
    let is_last_processed = index == total.min(MAX_IMAGES_PER_SET);
    ImagePlan {
        index,
        total,
        process,
        reply: process && is_last_processed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(index: u32, total: u32) -> ImageSetMembership {
        ImageSetMembership {
            set_id: "s".to_string(),
            index,
            total,
        }
    }

    #[test]
    fn test_standalone_image_processes_and_replies() {
        let plan = plan_image(None);
        assert_eq!((plan.index, plan.total), (1, 1));
        assert!(plan.process);
        assert!(plan.reply);
    }

    #[test]
    fn test_set_of_three_replies_only_on_third() {
        let replies: Vec<bool> = (1..=3).map(|i| plan_image(Some(&set(i, 3))).reply).collect();
        assert_eq!(replies, vec![false, false, true]);
        assert!((1..=3).all(|i| plan_image(Some(&set(i, 3))).process));
    }

    #[test]
    fn test_set_of_six_caps_at_four() {
        let plans: Vec<ImagePlan> = (1..=6).map(|i| plan_image(Some(&set(i, 6)))).collect();
        let processed: Vec<u32> = plans.iter().filter(|p| p.process).map(|p| p.index).collect();
        let replied: Vec<u32> = plans.iter().filter(|p| p.reply).map(|p| p.index).collect();
        assert_eq!(processed, vec![1, 2, 3, 4]);
        assert_eq!(replied, vec![4]);
        assert_eq!(plans[0].last_processed_index(), 4);
    }

    #[test]
    fn test_index_beyond_cap_never_replies() {
        for index in 5..=10 {
            let plan = plan_image(Some(&set(index, 10)));
            assert!(!plan.process);
            assert!(!plan.reply);
        }
    }

    #[test]
    fn test_set_of_exactly_four() {
        assert!(plan_image(Some(&set(4, 4))).reply);
        assert!(!plan_image(Some(&set(3, 4))).reply);
    }
}
