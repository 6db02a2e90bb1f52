use crate::travelling_salesman::CityRegistry;

pub fn solve(registry: &CityRegistry) -> Vec<usize> {
    let num_cities = registry.len();
    if num_cities == 0 {
        return Vec::new();
    }

    let mut remaining: Vec<bool> = vec![true; num_cities];
    let mut route = Vec::with_capacity(num_cities);
    let mut current_city = 0;
    remaining[current_city] = false;
    route.push(current_city);

    while route.len() < num_cities {
        let next_city = (0..num_cities)
            .filter(|&city| remaining[city])
            .min_by(|&a, &b| {
                registry
                    .distance(current_city, a)
                    .total_cmp(&registry.distance(current_city, b))
            });
        match next_city {
            Some(city) => {
                remaining[city] = false;
                route.push(city);
                current_city = city;
            }
            None => break,
        }
    }
    route
}
