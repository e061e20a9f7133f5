//! Coins inserted before starting a machine.

/// Accepted denominations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coin {
    One,
    Five,
    Ten,
}

impl Coin {
    pub const ALL: [Coin; 3] = [Coin::One, Coin::Five, Coin::Ten];

    pub fn value(self) -> u32 {
        match self {
            Coin::One => 1,
            Coin::Five => 5,
            Coin::Ten => 10,
        }
    }
}

/// Count of inserted coins per denomination.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoinTray {
    ones: u32,
    fives: u32,
    tens: u32,
}

impl CoinTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(ones: u32, fives: u32, tens: u32) -> Self {
        Self { ones, fives, tens }
    }

    pub fn count(&self, coin: Coin) -> u32 {
        match coin {
            Coin::One => self.ones,
            Coin::Five => self.fives,
            Coin::Ten => self.tens,
        }
    }

    fn count_mut(&mut self, coin: Coin) -> &mut u32 {
        match coin {
            Coin::One => &mut self.ones,
            Coin::Five => &mut self.fives,
            Coin::Ten => &mut self.tens,
        }
    }

    pub fn add(&mut self, coin: Coin) {
        let count = self.count_mut(coin);
        *count = count.saturating_add(1);
    }

    /// Take back one coin, nothing happens if there is none.
    pub fn remove(&mut self, coin: Coin) {
        let count = self.count_mut(coin);
        *count = count.saturating_sub(1);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u32 {
        Coin::ALL.iter().fold(0u32, |total, coin| {
            total.saturating_add(coin.value().saturating_mul(self.count(*coin)))
        })
    }

    pub fn can_confirm(&self, price: u32) -> bool {
        self.total() >= price
    }

    /// `None` while the total does not cover `price`.
    pub fn change(&self, price: u32) -> Option<u32> {
        self.total().checked_sub(price)
    }

    /// Amount still missing, `None` once `price` is covered.
    pub fn shortfall(&self, price: u32) -> Option<u32> {
        price.checked_sub(self.total()).filter(|missing| *missing > 0)
    }

    /// Hand over the coins to pay `price`.
    /// Return the total and empty the tray, or `None` and keep the coins if the total is short.
    pub fn confirm(&mut self, price: u32) -> Option<u32> {
        if !self.can_confirm(price) {
            return None;
        }
        let total = self.total();
        self.clear();
        Some(total)
    }

    /// One line description of the tray against `price`.
    pub fn summary(&self, price: u32) -> String {
        match self.shortfall(price) {
            Some(missing) => format!(
                "Inserted {} of {}, {} more needed",
                self.total(),
                price,
                missing
            ),
            None => format!(
                "Inserted {} of {}, change {}",
                self.total(),
                price,
                self.change(price).unwrap_or(0)
            ),
        }
    }
}
