use crate::scene::{ids, Element, Scene, Tag};

pub const CARD_TITLE: &str = "Levitation started";
pub const CARD_BODY: &str = "The magnet starts to levitate because the material expels the magnetic \
                             field (Meissner effect).";

/// The dismissible "levitation started" card.
///
/// Created inside the scene the first time it is shown, then toggled by
/// visibility. Each show hides itself again after `auto_hide_ms`.
#[derive(Clone, Debug)]
pub struct LevitationCard {
    auto_hide_ms: f64,
    hide_at_ms: Option<f64>,
    shown: u32,
}

impl LevitationCard {
    pub fn new(auto_hide_ms: f64) -> Self {
        Self {
            auto_hide_ms,
            hide_at_ms: None,
            shown: 0,
        }
    }

    /// How many times the card has been shown
    pub fn shown(&self) -> u32 {
        self.shown
    }

    pub fn show(&mut self, scene: &mut Scene, now_ms: f64) {
        match scene.get_mut(ids::LEVITATION_CARD) {
            Some(card) => card.set_visible(true),
            None => {
                scene.insert(
                    Element::new(ids::LEVITATION_CARD, Tag::Div)
                        .with_attr("title", CARD_TITLE)
                        .with_attr("role", "status")
                        .with_text(CARD_BODY),
                );
                log::info!("Levitation card created");
            }
        }
        self.shown += 1;
        self.hide_at_ms = Some(now_ms + self.auto_hide_ms);
    }

    /// Hide the card once its auto-hide delay has passed
    pub fn tick(&mut self, scene: &mut Scene, now_ms: f64) {
        let Some(hide_at) = self.hide_at_ms else {
            return;
        };
        if now_ms < hide_at {
            return;
        }
        self.hide_at_ms = None;
        if let Some(card) = scene.get_mut(ids::LEVITATION_CARD) {
            card.set_visible(false);
        }
    }

    /// Close button: take the card out of the scene
    pub fn dismiss(&mut self, scene: &mut Scene) {
        self.hide_at_ms = None;
        if scene.remove(ids::LEVITATION_CARD).is_some() {
            log::debug!("Levitation card dismissed");
        }
    }

    pub fn is_visible(scene: &Scene) -> bool {
        scene
            .get(ids::LEVITATION_CARD)
            .is_some_and(Element::is_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_creates_card_and_auto_hides() {
        let mut scene = Scene::new();
        let mut card = LevitationCard::new(6000.0);

        card.show(&mut scene, 1000.0);
        assert!(LevitationCard::is_visible(&scene));
        assert_eq!(
            scene.get(ids::LEVITATION_CARD).unwrap().attr("title"),
            Some(CARD_TITLE)
        );

        card.tick(&mut scene, 6999.0);
        assert!(LevitationCard::is_visible(&scene));
        card.tick(&mut scene, 7000.0);
        assert!(!LevitationCard::is_visible(&scene));
        assert!(scene.contains(ids::LEVITATION_CARD));
    }

    #[test]
    fn test_show_again_reuses_card() {
        let mut scene = Scene::new();
        let mut card = LevitationCard::new(100.0);

        card.show(&mut scene, 0.0);
        card.tick(&mut scene, 100.0);
        card.show(&mut scene, 200.0);

        assert!(LevitationCard::is_visible(&scene));
        assert_eq!(card.shown(), 2);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_dismiss_removes_card() {
        let mut scene = Scene::new();
        let mut card = LevitationCard::new(6000.0);

        card.show(&mut scene, 0.0);
        card.dismiss(&mut scene);
        assert!(!scene.contains(ids::LEVITATION_CARD));

        // A pending auto-hide has nothing left to do
        card.tick(&mut scene, 10_000.0);
        assert!(!LevitationCard::is_visible(&scene));
    }
}
